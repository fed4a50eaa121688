use shell::builtins::{self, prelude::*, BuiltinCommand};

pub struct Quit;

impl BuiltinCommand for Quit {
    const NAME: &'static str = builtins::QUIT_NAME;

    fn run<T: AsRef<str>>(shell: &mut Shell, _args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        shell.exit(0)
    }
}
