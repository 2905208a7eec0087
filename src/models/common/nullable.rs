//! 可清空字段的反序列化
//!
//! 更新请求中 `Option<Option<T>>` 区分三种情况：字段缺省为 `None`（保持不变），
//! 显式 `null` 为 `Some(None)`（清空），给出值为 `Some(Some(v))`（覆盖）。

use serde::{Deserialize, Deserializer};

/// 配合 `#[serde(default)]` 使用，使显式 `null` 反序列化为 `Some(None)`
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
