/// Category bucket for expenses without a linked inventory item
pub const GENERAL_EXPENSE_CATEGORY: &str = "General";

/// Month bucket key format for trend grouping
pub const MONTH_BUCKET_FORMAT: &str = "%Y-%m";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
