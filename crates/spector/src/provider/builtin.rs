use super::{SignatureProvider, parse_signatures};
use crate::error::Result;
use crate::signature::Signature;

const BUILTIN_SIGNATURES: &str = include_str!("../../signatures/builtin.json");

/// Signatures for common formats, compiled into the crate
pub fn builtin_signatures() -> Result<Vec<Signature>> {
    parse_signatures(BUILTIN_SIGNATURES)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProvider;

impl BuiltinProvider {
    pub const NAME: &'static str = "Builtin Signature Provider";
}

impl SignatureProvider for BuiltinProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn signatures(&self) -> Result<Vec<Signature>> {
        builtin_signatures()
    }
}
