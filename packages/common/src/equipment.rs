/// Header of the equipment name column.
pub const COL_EQUIPMENT_NAME: &str = "Equipment Name";
/// Header of the categorical equipment type column.
pub const COL_TYPE: &str = "Type";
/// Header of the integer flow rate column (m³/h).
pub const COL_FLOWRATE: &str = "Flowrate";
/// Header of the pressure column (bar).
pub const COL_PRESSURE: &str = "Pressure";
/// Header of the integer temperature column (°C).
pub const COL_TEMPERATURE: &str = "Temperature";

/// Columns every uploaded CSV must carry, matched case-sensitively after trimming.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_EQUIPMENT_NAME,
    COL_TYPE,
    COL_FLOWRATE,
    COL_PRESSURE,
    COL_TEMPERATURE,
];

/// Number of upload batches retained when no override is configured.
pub const DEFAULT_MAX_BATCHES: u64 = 5;

/// Unit shown next to flow rate averages.
pub const FLOW_UNIT: &str = "m³/h";
/// Unit shown next to pressure averages.
pub const PRESSURE_UNIT: &str = "bar";
/// Unit shown next to temperature averages.
pub const TEMPERATURE_UNIT: &str = "°C";
