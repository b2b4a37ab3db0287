//! 密码哈希 / Salted SHA-256 password hashing

use rand::RngCore;
use sha2::{Digest, Sha256};

pub const MIN_LEN: usize = 6;

/// 16 字节随机盐（hex）
pub fn generar_salt() -> String {
    let mut buf = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

pub fn hash(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// 返回 `(hash, salt)`
pub fn hash_nuevo(password: &str) -> (String, String) {
    let salt = generar_salt();
    (hash(password, &salt), salt)
}

/// 常量时间比较；服务不提供登录，仅用于校验存储结果
#[cfg(test)]
pub(crate) fn verificar(password: &str, salt: &str, esperado: &str) -> bool {
    let calculado = hash(password, salt);
    calculado.len() == esperado.len()
        && calculado
            .bytes()
            .zip(esperado.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_differ_and_verify() {
        let (h1, s1) = hash_nuevo("secreto1");
        let (h2, s2) = hash_nuevo("secreto1");
        assert_ne!(s1, s2);
        assert_ne!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert_eq!(s1.len(), 32);
        assert!(verificar("secreto1", &s1, &h1));
        assert!(!verificar("secreto2", &s1, &h1));
    }

    #[test]
    fn known_digest_is_lowercase_hex() {
        // sha256("") con sal vacía
        assert_eq!(
            hash("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
