/// The one table this application reads from.
///
/// Applied on every start. `IF NOT EXISTS` makes it a no-op once the table
/// is there; the shape of an existing table is not checked.
pub const ACADEMICS_DDL: &str = "
    CREATE TABLE IF NOT EXISTS academics (
        id SERIAL PRIMARY KEY,
        full_name TEXT NOT NULL,
        birth_date DATE NOT NULL,
        specialization TEXT NOT NULL,
        year_rank_assignment INT NOT NULL
    );
";
