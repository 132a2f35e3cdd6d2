use crc32fast::Hasher;

/// Ephemeral, position-scoped node identifier.
///
/// Assigned by the document tree at attach time. Never persisted as semantic
/// identity; that is the node's `uuid`.
pub type NodeKey = String;

/// Derive a document seed from its storage path using CRC32
pub fn document_seed(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("lesson://") {
        buff = format!("lesson://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential key generator for nodes attached to one document
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    seed: String, // Document seed (CRC32)
    count: u32,   // Sequential counter
}

impl KeyGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: document_seed(path),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential key
    pub fn next_key(&mut self) -> NodeKey {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_is_stable() {
        let a = document_seed("/intro-to-biology.lesson");
        let b = document_seed("/intro-to-biology.lesson");
        assert_eq!(a, b);

        let c = document_seed("/intro-to-chemistry.lesson");
        assert_ne!(a, c);
    }

    #[test]
    fn test_sequential_keys() {
        let mut keys = KeyGenerator::new("/test.lesson");

        let k1 = keys.next_key();
        let k2 = keys.next_key();
        let k3 = keys.next_key();

        assert!(k1.ends_with("-1"));
        assert!(k2.ends_with("-2"));
        assert!(k3.ends_with("-3"));

        let seed = keys.seed();
        assert!(k1.starts_with(seed));
        assert!(k3.starts_with(seed));
    }
}
