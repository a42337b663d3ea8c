use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::block::DataBlock;

/// Detected file type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub mime: String,
    pub extension: String,
}

impl TypeInfo {
    pub fn new(mime: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            extension: extension.into(),
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[mime={}, ext={}]", self.mime, self.extension)
    }
}

/// Named set of data blocks identifying one file type.
///
/// Signatures compare and hash by name, ignoring ASCII case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    name: String,
    #[serde(alias = "ext")]
    extension: String,
    mime: String,
    #[serde(default)]
    blocks: Vec<DataBlock>,
    #[serde(skip)]
    total_block_size: OnceLock<usize>,
}

impl Signature {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            mime: mime.into(),
            blocks: Vec::new(),
            total_block_size: OnceLock::new(),
        }
    }

    /// Append a block.
    ///
    /// The total block size is memoized on first access and is not updated by
    /// blocks added afterwards.
    pub fn with_block(mut self, block: DataBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn blocks(&self) -> &[DataBlock] {
        &self.blocks
    }

    /// Sum of all block sizes, computed once
    pub fn total_block_size(&self) -> usize {
        *self
            .total_block_size
            .get_or_init(|| self.blocks.iter().map(DataBlock::size).sum())
    }

    pub fn type_info(&self) -> TypeInfo {
        TypeInfo::new(&self.mime, &self.extension)
    }

    fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[name={}, type={}, ext={}]",
            self.name, self.mime, self.extension
        )
    }
}

/// Insertion-ordered signatures, unique by case-insensitive name
#[derive(Debug, Clone, Default)]
pub struct SignatureSet {
    signatures: Vec<Arc<Signature>>,
    names: HashSet<String>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature. Returns `false` if one with the same name is
    /// already present, in which case the set is unchanged.
    pub fn insert(&mut self, signature: Signature) -> bool {
        if !self.names.insert(signature.key()) {
            return false;
        }
        self.signatures.push(Arc::new(signature));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Signature>> {
        self.signatures
            .iter()
            .find(|signature| signature.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Signature>> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl<'a> IntoIterator for &'a SignatureSet {
    type Item = &'a Arc<Signature>;
    type IntoIter = std::slice::Iter<'a, Arc<Signature>>;

    fn into_iter(self) -> Self::IntoIter {
        self.signatures.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::SeekMode;

    fn block(offset: i64, bytes: &str) -> DataBlock {
        DataBlock::new("block", offset, SeekMode::Begin, bytes).unwrap()
    }

    #[test]
    fn test_total_block_size() {
        let signature = Signature::new("WAV", "wav", "audio/wav")
            .with_block(block(0, "52494646"))
            .with_block(block(8, "57415645"));
        assert_eq!(signature.total_block_size(), 8);
    }

    #[test]
    fn test_total_block_size_is_memoized() {
        let signature = Signature::new("A", "a", "application/a").with_block(block(0, "0001"));
        assert_eq!(signature.total_block_size(), 2);

        let signature = signature.with_block(block(2, "02030405"));
        assert_eq!(signature.blocks().len(), 2);
        assert_eq!(signature.total_block_size(), 2);
    }

    #[test]
    fn test_equality_ignores_case() {
        let a = Signature::new("Png", "png", "image/png");
        let b = Signature::new("PNG", "other", "image/other");
        let c = Signature::new("JPEG", "jpg", "image/jpeg");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_signature_set_dedup_keeps_first() {
        let mut set = SignatureSet::new();
        assert!(set.insert(Signature::new("PNG", "png", "image/png")));
        assert!(set.insert(Signature::new("GIF", "gif", "image/gif")));
        assert!(!set.insert(Signature::new("png", "apng", "image/apng")));

        assert_eq!(set.len(), 2);
        assert!(set.contains("Png"));
        assert_eq!(set.get("png").unwrap().extension(), "png");

        let names: Vec<&str> = set.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["PNG", "GIF"]);
    }

    #[test]
    fn test_deserialize_signature() {
        let json = r#"{
            "name": "PNG",
            "ext": "png",
            "mime": "image/png",
            "blocks": [{"name": "header", "offset": 0, "seek": "Begin", "bytes": "89504E470D0A1A0A"}]
        }"#;
        let signature: Signature = serde_json::from_str(json).unwrap();
        assert_eq!(signature.extension(), "png");
        assert_eq!(signature.total_block_size(), 8);
        assert_eq!(signature.type_info(), TypeInfo::new("image/png", "png"));
    }

    #[test]
    fn test_deserialize_signature_with_bad_pattern() {
        let json = r#"{"name": "X", "extension": "x", "mime": "x/x", "blocks": [{"bytes": "ZZ"}]}"#;
        assert!(serde_json::from_str::<Signature>(json).is_err());
    }

    #[test]
    fn test_type_info_display() {
        let info = TypeInfo::new("image/png", "png");
        assert_eq!(info.to_string(), "[mime=image/png, ext=png]");
    }
}
