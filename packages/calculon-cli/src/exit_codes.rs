pub const SUCCESS: i32 = 0;
/// Any failure: bad or missing flags, unreadable input, filter or write errors
pub const FAILURE: i32 = 1;
