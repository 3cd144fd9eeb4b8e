/// Closed set of tables the stores are allowed to address.
///
/// Table names are the only identifiers ever formatted into SQL text;
/// every other value is bound as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Employees,
    Absensi,
    Activities,
    Log,
}

impl Table {
    /// Convert enum → DB table name
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Table::Employees => "employees",
            Table::Absensi => "absensi",
            Table::Activities => "activities",
            Table::Log => "log",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_names_match_the_schema() {
        assert_eq!(Table::Employees.to_db_str(), "employees");
        assert_eq!(Table::Absensi.to_db_str(), "absensi");
        assert_eq!(Table::Activities.to_db_str(), "activities");
        assert_eq!(Table::Log.to_db_str(), "log");
    }
}
