//! Static description of the student records table exposed to the LLM.

/// Table that all generated queries run against.
pub const TABLE_NAME: &str = "students";

/// Columns of the `students` table, in declaration order.
pub const COLUMNS: [&str; 19] = [
    "id",
    "full_name",
    "gender",
    "academic_year",
    "year_of_study",
    "roll_number_with_degree",
    "address",
    "phone_number",
    "state",
    "pincode",
    "department",
    "hostel",
    "day_scholar",
    "bus_traveller",
    "sports_participation",
    "paid_semesters",
    "unpaid_semesters",
    "arrear_status",
    "arrear_paper_names",
];

/// Renders the column list as one name per line for prompt templates.
pub fn column_block() -> String {
    COLUMNS.join("\n")
}
