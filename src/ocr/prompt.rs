//! Extraction prompt sent to the vision model, selectable by language.

/// Language of the extraction prompt. Spanish is the default; the invoices
/// themselves are Argentine either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptLanguage {
    Spanish,
    English,
    Portuguese,
}

impl PromptLanguage {
    /// Parse an ISO-639-ish code; anything unrecognized falls back to Spanish.
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "en" | "english" => PromptLanguage::English,
            "pt" | "portuguese" | "portugues" => PromptLanguage::Portuguese,
            _ => PromptLanguage::Spanish,
        }
    }
}

/// Fields the model is asked to fill. Kept in one place so the prompt and
/// the parser cannot drift apart silently.
const JSON_SHAPE: &str = r#"{
  "supplierName": "...",
  "supplierCuit": "XX-XXXXXXXX-X",
  "amount": 0,
  "amount_105": 0,
  "total_neto": 0,
  "vat_amount_21": 0,
  "vat_amount_105": 0,
  "has_ii_bb": false,
  "ii_bb_amount": 0,
  "total_amount": 0,
  "date": "YYYY-MM-DD",
  "invoiceType": "A",
  "confidence": 0
}"#;

/// Build the extraction prompt for the given language.
pub fn extraction_prompt(language: PromptLanguage) -> String {
    match language {
        PromptLanguage::Spanish => format!(
            "Analiza esta imagen de factura y extrae la siguiente informacion en formato JSON:\n\
             {JSON_SHAPE}\n\n\
             Si no puedes encontrar algun valor, usa 0 para numeros y null para strings.\n\
             Busca especialmente:\n\
             - CUIT del proveedor (formato XX-XXXXXXXX-X, con guiones)\n\
             - Fecha de la factura\n\
             - Nombre del proveedor/empresa\n\
             - Montos con y sin IVA (21% y 10.5%)\n\
             - Percepciones o retenciones de Ingresos Brutos (IIBB)\n\
             - Tipo de factura (A o X)\n\
             - Total final\n\
             En \"confidence\" indica tu porcentaje de confianza (0-100).\n\
             Responde SOLO con el JSON, sin texto adicional."
        ),
        PromptLanguage::English => format!(
            "Analyze this invoice image and extract the following information as JSON:\n\
             {JSON_SHAPE}\n\n\
             If a value cannot be found, use 0 for numbers and null for strings.\n\
             Look especially for:\n\
             - The supplier CUIT (format XX-XXXXXXXX-X, hyphenated)\n\
             - The invoice date\n\
             - The supplier/company name\n\
             - Amounts with and without VAT (21% and 10.5%)\n\
             - Gross-receipts (IIBB) withholdings or perceptions\n\
             - Invoice type (A or X)\n\
             - The final total\n\
             In \"confidence\" report your confidence percentage (0-100).\n\
             Reply ONLY with the JSON, no extra text."
        ),
        PromptLanguage::Portuguese => format!(
            "Analise esta imagem de fatura e extraia as seguintes informacoes em formato JSON:\n\
             {JSON_SHAPE}\n\n\
             Se nao encontrar algum valor, use 0 para numeros e null para strings.\n\
             Procure especialmente:\n\
             - CUIT do fornecedor (formato XX-XXXXXXXX-X, com hifens)\n\
             - Data da fatura\n\
             - Nome do fornecedor/empresa\n\
             - Valores com e sem IVA (21% e 10.5%)\n\
             - Percepcoes ou retencoes de Ingresos Brutos (IIBB)\n\
             - Tipo de fatura (A ou X)\n\
             - Total final\n\
             Em \"confidence\" informe sua porcentagem de confianca (0-100).\n\
             Responda SOMENTE com o JSON, sem texto adicional."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_falls_back_to_spanish() {
        assert_eq!(PromptLanguage::from_code("es"), PromptLanguage::Spanish);
        assert_eq!(PromptLanguage::from_code("fr"), PromptLanguage::Spanish);
        assert_eq!(PromptLanguage::from_code(""), PromptLanguage::Spanish);
        assert_eq!(PromptLanguage::from_code("EN"), PromptLanguage::English);
        assert_eq!(PromptLanguage::from_code("pt"), PromptLanguage::Portuguese);
    }

    #[test]
    fn every_prompt_names_every_json_key() {
        for lang in [
            PromptLanguage::Spanish,
            PromptLanguage::English,
            PromptLanguage::Portuguese,
        ] {
            let prompt = extraction_prompt(lang);
            for key in [
                "supplierName",
                "supplierCuit",
                "amount_105",
                "total_neto",
                "vat_amount_21",
                "vat_amount_105",
                "has_ii_bb",
                "ii_bb_amount",
                "total_amount",
                "invoiceType",
                "confidence",
            ] {
                assert!(prompt.contains(key), "{lang:?} prompt missing {key}");
            }
        }
    }
}
