use candid::CandidType;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Level
///

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, CandidType, Display, Serialize, Deserialize,
)]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

///
/// Topic
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Topic {
    Auth,
    Automation,
    Certificate,
    Config,
    Delegation,
    Init,
    Monitoring,
    RateLimit,
}

#[macro_export]
macro_rules! log {
    // with topic
    ($topic:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner Some(&$topic.to_string()), $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // no topic
    ($level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner None::<&str>, $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    (@inner $topic:expr, $level:expr, $fmt:expr $(, $arg:expr)*) => {{
        let level = $level;
        let topic_opt: Option<&str> = $topic;
        let message = format!($fmt $(, $arg)*);

        let topic = topic_opt.unwrap_or("-");
        let topic_centered = format!("{:^11}", topic);

        let (color, reset) = match level {
            $crate::log::Level::Ok    => ("\x1b[32m", "\x1b[0m"),
            $crate::log::Level::Info  => ("\x1b[34m", "\x1b[0m"),
            $crate::log::Level::Warn  => ("\x1b[33m", "\x1b[0m"),
            $crate::log::Level::Error => ("\x1b[31m", "\x1b[0m"),
            $crate::log::Level::Debug => ("", ""),
        };

        let label = format!("{color}{:^5}{reset}", level.to_string().to_uppercase());
        $crate::log::__emit(&format!("{label}|{topic_centered}| {message}"));
    }};
}

#[doc(hidden)]
pub fn __emit(line: &str) {
    #[cfg(target_arch = "wasm32")]
    crate::cdk::println!("{line}");

    // ic0 debug_print is unavailable off-chain
    #[cfg(not(target_arch = "wasm32"))]
    std::eprintln!("{line}");
}
