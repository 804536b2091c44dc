use crate::error::AppResult;

pub fn print_lines<S: AsRef<str>>(lines: &[S]) -> AppResult<()> {
    for line in lines {
        println!("{}", line.as_ref());
    }
    Ok(())
}
