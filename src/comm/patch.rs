//! PATCH 请求的字段合并辅助 / Helpers for merge-only-provided-fields updates.
//!
//! Nullable columns use `Option<Option<T>>` in patch bodies:
//! absent key -> `None` (keep), `null` -> `Some(None)` (clear),
//! value -> `Some(Some(v))` (set). Pair the field with
//! `#[serde(default, deserialize_with = "crate::comm::patch::nullable")]`.

use serde::{Deserialize, Deserializer};

pub fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// 仅在提供时覆盖 / Overwrite only when provided
pub fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "nullable")]
        notas: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        let null: Body = serde_json::from_str(r#"{"notas": null}"#).unwrap();
        let value: Body = serde_json::from_str(r#"{"notas": "hola"}"#).unwrap();
        assert_eq!(absent.notas, None);
        assert_eq!(null.notas, Some(None));
        assert_eq!(value.notas, Some(Some("hola".to_string())));
    }

    #[test]
    fn merge_keeps_value_when_absent() {
        let mut precio = 10.0;
        merge(&mut precio, None);
        assert_eq!(precio, 10.0);
        merge(&mut precio, Some(12.5));
        assert_eq!(precio, 12.5);
    }
}
