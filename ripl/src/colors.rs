//! Terminal colors, only applied when logging to a terminal.
use crate::config::get_config;
use colored::Colorize;

pub trait MaybeColorize {
    fn green(&self) -> String;
    fn red(&self) -> String;
    fn yellow(&self) -> String;
}

fn paint(string: &str, color: fn(&str) -> colored::ColoredString) -> String {
    if get_config().general.tty {
        color(string).to_string()
    } else {
        string.to_string()
    }
}

impl MaybeColorize for &str {
    fn green(&self) -> String {
        paint(self, |s| Colorize::green(s))
    }

    fn red(&self) -> String {
        paint(self, |s| Colorize::red(s))
    }

    fn yellow(&self) -> String {
        paint(self, |s| Colorize::yellow(s))
    }
}

impl MaybeColorize for String {
    fn green(&self) -> String {
        MaybeColorize::green(&self.as_str())
    }

    fn red(&self) -> String {
        MaybeColorize::red(&self.as_str())
    }

    fn yellow(&self) -> String {
        MaybeColorize::yellow(&self.as_str())
    }
}
