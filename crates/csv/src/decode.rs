//! Permissive text decoding

/// Decode UTF-8, dropping invalid byte sequences instead of failing
pub fn utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_text_unchanged() {
        assert_eq!(utf8_dropping_invalid("a,b\n日本,é\n".as_bytes()), "a,b\n日本,é\n");
    }

    #[test]
    fn test_invalid_sequences_dropped() {
        let bytes = b"na\xffme,val\xc3\n1,2\n";
        assert_eq!(utf8_dropping_invalid(bytes), "name,val\n1,2\n");
    }
}
