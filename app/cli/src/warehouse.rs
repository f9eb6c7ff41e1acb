//! FILENAME: app/cli/src/warehouse.rs
//! Field layout of the fuel sales warehouse join (sales/ICMS fact table with
//! its station, location, fuel and time dimensions).

use dataset::{FieldDef, Schema, SchemaError, ValueType};

// Fact
pub const ID_POSTO: &str = "id_posto";
pub const ID_COMBUSTIVEL: &str = "id_combustivel";
pub const ID_TEMPO: &str = "id_tempo";
pub const CEP: &str = "CEP";
pub const VALOR_VENDA: &str = "Valor_venda";
pub const ICMS_MEDIO: &str = "ICMS_Medio";
pub const IMPACTO_ICMS: &str = "Impacto_ICMS";
pub const VALOR_PRODUCAO_PETROLEO: &str = "Valor_Producao_Petroleo";
pub const UNIDADE: &str = "Unidade";

// Station
pub const NOME_POSTO: &str = "Nome_posto";
pub const BANDEIRA: &str = "Bandeira";
pub const CNPJ_POSTO: &str = "CNPJ_posto";

// Location
pub const CEP_LOCAL: &str = "cep_local";
pub const BAIRRO: &str = "Bairro";
pub const MUNICIPIO: &str = "Municipio";
pub const ESTADO: &str = "estado_localizacao";
pub const REGIAO: &str = "Regiao";

// Fuel
pub const TIPO_COMBUSTIVEL: &str = "Tipo_combustivel";
pub const ESPECIFICACAO: &str = "Especificacao";

// Time
pub const DATA_TRANSACAO: &str = "data_transacao";
pub const ANO: &str = "Ano";
pub const MES: &str = "Mes";
pub const TRIMESTRE: &str = "Trimestre";
pub const SEMANA: &str = "Semana";

/// Label used for records without a region.
pub const UNKNOWN_REGION: &str = "Não Informado";

/// All 24 fields of the warehouse join, in export order.
pub fn fuel_sales_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::identifier(ID_POSTO, ValueType::Number),
        FieldDef::identifier(ID_COMBUSTIVEL, ValueType::Number),
        FieldDef::identifier(ID_TEMPO, ValueType::Number),
        FieldDef::identifier(CEP, ValueType::Text),
        FieldDef::measure(VALOR_VENDA),
        FieldDef::measure(ICMS_MEDIO),
        FieldDef::measure(IMPACTO_ICMS),
        FieldDef::measure(VALOR_PRODUCAO_PETROLEO),
        FieldDef::dimension(UNIDADE, ValueType::Text),
        FieldDef::dimension(NOME_POSTO, ValueType::Text),
        FieldDef::dimension(BANDEIRA, ValueType::Text),
        FieldDef::identifier(CNPJ_POSTO, ValueType::Text),
        FieldDef::identifier(CEP_LOCAL, ValueType::Text),
        FieldDef::dimension(BAIRRO, ValueType::Text),
        FieldDef::dimension(MUNICIPIO, ValueType::Text),
        FieldDef::dimension(ESTADO, ValueType::Text),
        FieldDef::dimension(REGIAO, ValueType::Text),
        FieldDef::dimension(TIPO_COMBUSTIVEL, ValueType::Text),
        FieldDef::dimension(ESPECIFICACAO, ValueType::Text),
        FieldDef::dimension(DATA_TRANSACAO, ValueType::Date),
        FieldDef::dimension(ANO, ValueType::Number),
        FieldDef::dimension(MES, ValueType::Number),
        FieldDef::dimension(TRIMESTRE, ValueType::Number),
        FieldDef::dimension(SEMANA, ValueType::Number),
    ]
}

pub fn fuel_sales_schema() -> Result<Schema, SchemaError> {
    Schema::new(fuel_sales_fields())
}

/// The warehouse fields present among `columns`, in warehouse order.
/// Unknown columns are ignored.
pub fn schema_for_columns(columns: &[String]) -> Result<Schema, SchemaError> {
    let present = fuel_sales_fields()
        .into_iter()
        .filter(|field| {
            columns
                .iter()
                .any(|c| c.trim_start_matches('\u{feff}').trim() == field.name)
        })
        .collect();
    Schema::new(present)
}
