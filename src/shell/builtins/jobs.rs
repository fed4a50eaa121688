use shell::builtins::{self, prelude::*, BuiltinCommand};

pub struct Jobs;

impl BuiltinCommand for Jobs {
    const NAME: &'static str = builtins::JOBS_NAME;

    fn run<T: AsRef<str>>(shell: &mut Shell, _args: &[T], stdout: &mut dyn Write) -> Result<()> {
        for job in shell.jobs() {
            writeln!(stdout, "{}", job).context(ErrorKind::Io)?;
        }
        Ok(())
    }
}

pub struct Fg;

impl BuiltinCommand for Fg {
    const NAME: &'static str = builtins::FG_NAME;

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        let spec = args
            .first()
            .ok_or_else(|| Error::missing_job_spec(Self::NAME))?;
        shell.put_job_in_foreground(spec.as_ref())
    }
}

pub struct Bg;

impl BuiltinCommand for Bg {
    const NAME: &'static str = builtins::BG_NAME;

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        let spec = args
            .first()
            .ok_or_else(|| Error::missing_job_spec(Self::NAME))?;
        shell.put_job_in_background(spec.as_ref())
    }
}
