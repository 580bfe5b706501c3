//! 内容指纹
//!
//! 请求体字节的确定性哈希，同时充当缓存 key 和存储文件名

/// 计算请求体的内容指纹
///
/// 字节级相同的输入永远得到相同的指纹，重复提交视为同一逻辑请求
pub fn fingerprint(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_same_fingerprint() {
        let a = fingerprint(b"hello world");
        let b = fingerprint(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_bytes_different_fingerprint() {
        assert_ne!(fingerprint(b"hello"), fingerprint(b"hello "));
    }

    #[test]
    fn test_hex_format() {
        let fp = fingerprint(b"abc");
        assert_eq!(fp.len(), 32);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        // md5 输出为小写 hex
        assert_eq!(fp, fp.to_lowercase());
    }

    #[test]
    fn test_empty_input_still_deterministic() {
        assert_eq!(fingerprint(b""), fingerprint(b""));
    }
}
