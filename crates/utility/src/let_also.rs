/// Kotlin-style `let`, so a value can be handed to a closure at the
/// end of a method chain instead of being bound to a temporary.
pub trait LetAlso: Sized {
    fn let_owned<R, F: FnOnce(Self) -> R>(self, f: F) -> R {
        f(self)
    }
}

impl<T> LetAlso for T {}
