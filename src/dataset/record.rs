//! Source row types and cleaning rules.

use serde::Deserialize;

/// One CSV row exactly as read. Every column is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "InvoiceNo")]
    pub invoice_no: Option<String>,
    #[serde(rename = "StockCode")]
    pub stock_code: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "InvoiceDate")]
    pub invoice_date: Option<String>,
    #[serde(rename = "UnitPrice")]
    pub unit_price: Option<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
}

/// A usable line item: all key columns present, numerics parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RetailRecord {
    pub invoice_no: String,
    pub stock_code: String,
    pub description: String,
    pub quantity: i64,
    pub invoice_date: String,
    pub unit_price: f64,
    pub customer_id: String,
    pub country: String,
}

impl RetailRecord {
    /// Clean a raw row. Returns `None` when the invoice number, customer id,
    /// stock code or description is missing.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let invoice_no = present(&raw.invoice_no)?;
        let customer_id = normalize_customer_id(present(&raw.customer_id)?);
        let stock_code = present(&raw.stock_code)?;
        let description = present(&raw.description)?;

        Some(Self {
            invoice_no: invoice_no.to_string(),
            stock_code: stock_code.to_string(),
            description: description.to_string(),
            quantity: present(&raw.quantity).and_then(parse_quantity).unwrap_or(0),
            invoice_date: present(&raw.invoice_date).unwrap_or_default().to_string(),
            unit_price: present(&raw.unit_price)
                .and_then(|p| p.parse::<f64>().ok())
                .filter(|p| p.is_finite())
                .unwrap_or(0.0),
            customer_id,
            country: present(&raw.country).unwrap_or_default().to_string(),
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_quantity(value: &str) -> Option<i64> {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|q| q.is_finite()).map(|q| q as i64))
}

/// Customer ids arrive as floats (`17850.0`) when the column has gaps;
/// integral values are rewritten without the fraction.
pub fn normalize_customer_id(id: &str) -> String {
    if id.contains('.') {
        if let Ok(value) = id.parse::<f64>() {
            if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
                return format!("{}", value as i64);
            }
        }
    }
    id.to_string()
}

/// Clean a batch, dropping unusable rows.
pub fn clean_records(raw: &[RawRecord]) -> Vec<RetailRecord> {
    raw.iter().filter_map(RetailRecord::from_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(invoice: &str, customer: &str) -> RawRecord {
        RawRecord {
            invoice_no: Some(invoice.to_string()),
            stock_code: Some("85123A".to_string()),
            description: Some("WHITE HANGING HEART T-LIGHT HOLDER".to_string()),
            quantity: Some("6".to_string()),
            invoice_date: Some("12/1/2010 8:26".to_string()),
            unit_price: Some("2.55".to_string()),
            customer_id: Some(customer.to_string()),
            country: Some("United Kingdom".to_string()),
        }
    }

    #[test]
    fn test_clean_row() {
        let record = RetailRecord::from_raw(&raw("536365", "17850.0")).unwrap();
        assert_eq!(record.invoice_no, "536365");
        assert_eq!(record.customer_id, "17850");
        assert_eq!(record.quantity, 6);
        assert_eq!(record.unit_price, 2.55);
    }

    #[test]
    fn test_missing_keys_are_dropped() {
        let mut no_customer = raw("536365", "");
        no_customer.customer_id = None;
        let mut blank_description = raw("536365", "17850");
        blank_description.description = Some("   ".to_string());

        assert!(RetailRecord::from_raw(&no_customer).is_none());
        assert!(RetailRecord::from_raw(&blank_description).is_none());
        assert_eq!(clean_records(&[no_customer, blank_description, raw("1", "2")]).len(), 1);
    }

    #[test]
    fn test_numeric_fallbacks() {
        let mut row = raw("536365", "17850");
        row.quantity = None;
        row.unit_price = Some("n/a".to_string());
        let record = RetailRecord::from_raw(&row).unwrap();
        assert_eq!(record.quantity, 0);
        assert_eq!(record.unit_price, 0.0);

        row.quantity = Some("-3.0".to_string());
        assert_eq!(RetailRecord::from_raw(&row).unwrap().quantity, -3);
    }

    #[test]
    fn test_customer_id_normalization() {
        assert_eq!(normalize_customer_id("17850.0"), "17850");
        assert_eq!(normalize_customer_id("17850"), "17850");
        assert_eq!(normalize_customer_id("17850.5"), "17850.5");
        assert_eq!(normalize_customer_id("C17850"), "C17850");
    }
}
