#[macro_export]
macro_rules! try_match {
    ($e:expr, $(|)? $pattern:pat $( if $guard:expr )? $(,)? => $v:expr) => {
        match $e {
            $pattern $( if $guard )? => Some($v),
            _ => None,
        }
    }
}

/// Like [`try_match!`], but panics if the value does not match.
///
/// Meant for destructuring results whose shape is already guaranteed by construction.
#[macro_export]
macro_rules! expect_match {
    ($e:expr, $(|)? $pattern:pat $( if $guard:expr )? $(,)? => $v:expr) => {
        match $e {
            $pattern $( if $guard )? => $v,
            other => panic!("unexpected pattern parse result: {:?}", other),
        }
    }
}
