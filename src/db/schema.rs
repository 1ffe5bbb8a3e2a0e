//! Column layout of the expense file.

/// Header row, in column order. Rows are decoded positionally against it,
/// so the order here is the on-disk contract.
pub const HEADERS: [&str; 7] = [
    "id",
    "fecha",
    "descripcion",
    "categoria",
    "monto",
    "mes",
    "año",
];

/// Date format used for the `fecha` column and the JSON API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
