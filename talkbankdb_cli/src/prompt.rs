//! Interactive credential prompt for protected collections.

use std::io::{self, BufRead, Write};

use talkbankdb_api::types::Credentials;
use talkbankdb_api::{CredentialPrompt, CredentialProvider};

/// Asks on the terminal for collection path, user ID and password, repeating
/// until the user declines to add another. An empty path cancels.
pub struct TerminalPrompt;

impl CredentialProvider for TerminalPrompt {
    fn credentials(&self) -> CredentialPrompt {
        let stdin = io::stdin();
        collect_credentials(stdin.lock(), io::stderr(), |label| {
            rpassword::prompt_password(label)
        })
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

fn collect_credentials<R, W, P>(mut input: R, mut output: W, mut read_password: P) -> CredentialPrompt
where
    R: BufRead,
    W: Write,
    P: FnMut(&str) -> io::Result<String>,
{
    let mut gathered = Vec::new();
    loop {
        let entry = (|| -> io::Result<Option<Credentials>> {
            let path = ask(&mut input, &mut output, "Path to authenticate: ")?;
            if path.is_empty() {
                return Ok(None);
            }
            let user_id = ask(&mut input, &mut output, "User ID: ")?;
            let password = read_password("Password: ")?;
            Ok(Some(Credentials::new(&path, &user_id, &password)))
        })();

        match entry {
            Ok(Some(credentials)) => gathered.push(credentials),
            Ok(None) | Err(_) => return CredentialPrompt::Cancelled,
        }

        match ask(&mut input, &mut output, "Authenticate another? (Y/N): ") {
            Ok(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => return CredentialPrompt::Provided(gathered),
        }
    }
}
