use crate::capture::ThreadContext;
use crate::event::{SourceLocation, TypedValue};

/// Record a function entry through the thread's capture context
#[inline]
pub fn function_enter(
    ctx: &mut ThreadContext,
    name: &str,
    args: Vec<TypedValue>,
    location: SourceLocation,
) {
    ctx.function_enter(name, args, location);
}

/// Record a function exit through the thread's capture context
#[inline]
pub fn function_exit(ctx: &mut ThreadContext, name: &str, return_value: Option<TypedValue>) {
    ctx.function_exit(name, return_value);
}
