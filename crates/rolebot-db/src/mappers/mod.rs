//! Entity <-> Model mappers

mod tracked_message;
