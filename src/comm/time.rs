//! 时间工具 / Time-of-day helpers
//!
//! Times of day travel as `"HH:MM"` on the wire; `"HH:MM:SS"` is accepted
//! on input.

use chrono::{NaiveTime, Timelike};

/// 解析 `HH:MM` 或 `HH:MM:SS`
pub fn parse_hora(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// 格式化为 `HH:MM`
pub fn format_hora(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// 自午夜起的分钟数 / Minutes since midnight
pub fn minutos(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// 分钟数转 `HH:MM`；超过 24h 时按 24h 取模
pub fn format_minutos(m: u32) -> String {
    let m = m % (24 * 60);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// serde 适配: `NaiveTime` <-> `"HH:MM"`
pub mod hora {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hora(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hora(&raw)
            .ok_or_else(|| de::Error::custom(format!("hora inválida '{}', se espera HH:MM", raw)))
    }
}

/// serde 适配: `Option<NaiveTime>`
pub mod hora_opcional {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&super::format_hora(*t)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) => super::parse_hora(&raw).map(Some).ok_or_else(|| {
                de::Error::custom(format!("hora inválida '{}', se espera HH:MM", raw))
            }),
        }
    }
}
