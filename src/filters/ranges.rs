//! Static menu lists that need no backend call.

use super::menu::MenuOption;

pub fn gpa_ranges() -> Vec<MenuOption> {
    [
        ("3.50 - 4.00", "numrange(3.5, 4, '[]')"),
        ("3.00 - 3.49", "numrange(3, 3.5, '[)')"),
        ("2.50 - 2.99", "numrange(2.5, 3, '[)')"),
        ("2.00 - 2.49", "numrange(2, 2.5, '[)')"),
        ("Below 2.0", "numrange(0, 2, '[)')"),
    ]
    .into_iter()
    .map(|(name, value)| MenuOption::new(name, value))
    .collect()
}

pub fn student_levels() -> Vec<MenuOption> {
    ["Freshman", "Sophomore", "Junior", "Senior"]
        .into_iter()
        .map(MenuOption::named)
        .collect()
}

pub fn unit_ranges() -> Vec<MenuOption> {
    [
        ("0 - 29", "numrange(NULL, 30, '[)')"),
        ("30 - 59", "numrange(30, 60, '[)')"),
        ("60 - 89", "numrange(60, 90, '[)')"),
        ("90 - 119", "numrange(90, 120, '[)')"),
        ("120 +", "numrange(120, NULL, '[)')"),
    ]
    .into_iter()
    .map(|(name, value)| MenuOption::new(name, value))
    .collect()
}
