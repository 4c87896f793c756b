use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Country assumed for every address
pub const DEFAULT_COUNTRY: &str = "United States";

/// Placeholder used when a listing has no usable address at all
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Structured address. Missing parts are empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for AddressComponents {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl AddressComponents {
    /// Human readable address, falling back to the raw text and then to a
    /// placeholder so the result is never empty
    pub fn full_address(&self, raw: &str) -> String {
        let state_zip = format!("{} {}", self.state, self.zip_code);
        let parts: Vec<&str> = [
            self.street.as_str(),
            self.city.as_str(),
            state_zip.trim(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect();

        if !parts.is_empty() {
            parts.join(", ")
        } else if !raw.trim().is_empty() {
            raw.to_string()
        } else {
            UNKNOWN_ADDRESS.to_string()
        }
    }
}

/// One scraped business listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub place_id: String,
    pub name: String,
    pub rating: f64,
    pub website: String,
    pub phone: String,
    pub main_category: String,
    pub broad_category: String,
    pub address: AddressComponents,
    pub full_address: String,
    pub link: String,
    pub query: String,
}

impl BusinessRecord {
    /// Creates an empty record for the given query
    pub fn new(query: &str) -> Self {
        Self {
            place_id: String::new(),
            name: String::new(),
            rating: 0.0,
            website: String::new(),
            phone: String::new(),
            main_category: String::new(),
            broad_category: String::new(),
            address: AddressComponents::default(),
            full_address: String::new(),
            link: String::new(),
            query: query.to_string(),
        }
    }

    /// Flattened (internal field name, value) pairs
    pub fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("place_id", Value::from(self.place_id.as_str())),
            ("name", Value::from(self.name.as_str())),
            ("rating", Value::from(self.rating)),
            ("website", Value::from(self.website.as_str())),
            ("phone", Value::from(self.phone.as_str())),
            ("main_category", Value::from(self.main_category.as_str())),
            ("broad_category", Value::from(self.broad_category.as_str())),
            ("street", Value::from(self.address.street.as_str())),
            ("city", Value::from(self.address.city.as_str())),
            ("state", Value::from(self.address.state.as_str())),
            ("zip_code", Value::from(self.address.zip_code.as_str())),
            ("country", Value::from(self.address.country.as_str())),
            ("full_address", Value::from(self.full_address.as_str())),
            ("link", Value::from(self.link.as_str())),
            ("query", Value::from(self.query.as_str())),
        ]
    }
}

/// Internal field name to output column name
pub const DEFAULT_COLUMNS: &[(&str, &str)] = &[
    ("place_id", "LocationID"),
    ("name", "BusinessName"),
    ("rating", "Score"),
    ("website", "URL"),
    ("phone", "Contact"),
    ("main_category", "Type"),
    ("broad_category", "Category"),
    ("street", "Street"),
    ("city", "City"),
    ("state", "State"),
    ("zip_code", "Zipcode"),
    ("country", "Country"),
    ("full_address", "Address"),
    ("link", "MapLink"),
    ("query", "SearchQuery"),
];

/// Renames record fields to output columns, dropping unmapped fields
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    columns: &'static [(&'static str, &'static str)],
}

impl ColumnMapping {
    /// Column table for a run. The base name does not currently change the table.
    pub fn for_base(_base: Option<&str>) -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
        }
    }

    pub fn column_for(&self, field: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    /// Output column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().map(|(_, column)| *column)
    }

    pub fn project(&self, record: &BusinessRecord) -> Row {
        let mut row = Row::default();
        for (field, value) in record.fields() {
            if let Some(column) = self.column_for(field) {
                row.push(column, value);
            }
        }
        row
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::for_base(None)
    }
}

/// An output record: named columns in a stable order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Inserts a column ahead of all others
    pub fn prepend(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(0, (column.into(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
