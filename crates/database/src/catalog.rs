/// The number of fixed queries the application offers.
pub const QUERY_COUNT: usize = 8;

/// The fixed query set, in trigger order. The text is sent to the server
/// verbatim; nothing is ever interpolated into it.
pub const FIXED_QUERIES: [&str; QUERY_COUNT] = [
    "SELECT * FROM academics ORDER BY LENGTH(full_name);",
    "SELECT REPLACE(full_name, ' ', '') AS new_name FROM academics;",
    "SELECT full_name, POSITION('ов' IN full_name) AS position_ov FROM academics;",
    "SELECT full_name, RIGHT(specialization, 2) AS two_letters FROM academics;",
    "SELECT DISTINCT specialization, REVERSE(specialization) AS reversed_specialization FROM academics;",
    "SELECT REPEAT('Какая-то фамилия ', 2) AS repeated_name;",
    "SELECT DATE '2023-12-31' - CURRENT_DATE AS days;",
    "SELECT specialization, CASE WHEN LENGTH(specialization) > 10 THEN 'длинный' ELSE 'короткий' END AS status FROM academics GROUP BY specialization;",
];

/// Looks up a fixed query by its index.
pub fn fixed_query(index: usize) -> Option<&'static str> {
    FIXED_QUERIES.get(index).copied()
}
