//! Prefix-steered conversation: speaker picking, prefix construction,
//! the interactive loop, and the one-shot ask.

pub mod ask;
pub mod conversation;
pub mod picker;
pub mod prefix;

#[cfg(test)]
pub(crate) mod test_support;
