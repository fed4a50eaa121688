macro_rules! log_if_err {
    ($result:expr, $($arg:tt)*) => {
        if let Err(ref e) = $result {
            error!("{}: {}", format_args!($($arg)*), e);
        }
    };
}
