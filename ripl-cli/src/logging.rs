use ripl::colors::MaybeColorize;

pub fn ok(something: impl ToString) {
    eprintln!("{} {}", "ok".green(), something.to_string());
}

pub fn error(something: impl ToString) {
    eprintln!("{}: {}", "error".red(), something.to_string());
}

pub fn warning(something: impl ToString) {
    eprintln!("{}: {}", "warning".yellow(), something.to_string());
}
