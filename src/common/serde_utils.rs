// src/common/serde_utils.rs

use serde::{Deserialize, Deserializer};

/// Distingue campo ausente (`None`) de `null` explícito (`Some(None)`).
///
/// Use com `#[serde(default, deserialize_with = "...")]` para que uma atualização parcial
/// consiga limpar colunas opcionais.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
