use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;

/// Address record as returned by ViaCEP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRecord {
    pub cep: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "complemento")]
    pub complement: String,
    #[serde(rename = "bairro")]
    pub neighbourhood: String,
    #[serde(rename = "localidade")]
    pub locality: String,
    #[serde(rename = "uf")]
    pub state: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
    /// ViaCEP answers 200 with `"erro": true` (or `"true"`) for unknown codes.
    #[serde(rename = "erro", deserialize_with = "deserialize_bool_from_anything")]
    pub not_found: bool,
}
