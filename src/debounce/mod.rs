mod debouncer;

#[cfg(test)]
mod tests;

pub use debouncer::{
    ActionDebouncer, AmbiguousPolicy, DebounceMode, DebouncePolicy, KeyEvent, KeyEventKind,
};
