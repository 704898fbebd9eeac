use htup::config::DEFAULT_INI_FILE_PATH;

pub use clap::Parser;
use clap::Subcommand;

const DEFAULT_METHOD: &str = "GET";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CommandLineArgs {
    #[clap(
        short = 'c',
        long,
        global = true,
        default_value = DEFAULT_INI_FILE_PATH,
        help = "configuration file path"
    )]
    config: String,
    #[clap(
        short = 'd',
        long,
        global = true,
        help = "project directory holding the endpoint files"
    )]
    dir: Option<String>,
    #[clap(short = 'v', long, global = true, help = "Print verbose message")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Send a request and print the response")]
    Send {
        #[clap(short = 'X', long, default_value = DEFAULT_METHOD, help = "HTTP method (GET/POST/PUT/DELETE)")]
        method: String,
        #[clap(help = "URL to send the request")]
        url: String,
        #[clap(help = "body text to send with the request, '-' reads stdin")]
        body: Option<String>,
        #[clap(short = 'H', long = "header", help = "extra request header as 'Name: value', repeatable")]
        headers: Vec<String>,
        #[clap(long, help = "Print the whole result as JSON")]
        json: bool,
    },
    #[command(about = "Send a saved endpoint")]
    Run {
        #[clap(help = "endpoint file, relative to the project directory")]
        name: String,
        #[clap(long, help = "Print the whole result as JSON")]
        json: bool,
    },
    #[command(about = "Create an empty GET endpoint")]
    New {
        #[clap(help = "endpoint file, relative to the project directory")]
        name: String,
    },
    #[command(about = "Write an endpoint, replacing any existing content")]
    Save {
        #[clap(help = "endpoint file, relative to the project directory")]
        name: String,
        #[clap(short = 'X', long, default_value = DEFAULT_METHOD, help = "HTTP method (GET/POST/PUT/DELETE)")]
        method: String,
        #[clap(help = "URL of the endpoint")]
        url: String,
        #[clap(help = "body text, '-' reads stdin")]
        body: Option<String>,
        #[clap(short = 'H', long = "header", help = "extra request header as 'Name: value', repeatable")]
        headers: Vec<String>,
    },
    #[command(about = "Print a saved endpoint")]
    Show {
        #[clap(help = "endpoint file, relative to the project directory")]
        name: String,
    },
    #[command(about = "List the endpoints in the project directory")]
    List,
    #[command(about = "Open an endpoint in $EDITOR and validate it afterwards")]
    Edit {
        #[clap(help = "endpoint file, relative to the project directory")]
        name: String,
    },
    #[command(about = "Create a project directory for grouping endpoints")]
    Project {
        #[clap(help = "directory name, relative to the project directory")]
        name: String,
    },
    #[command(about = "Create the project directory and write the configuration file")]
    Init,
}

impl CommandLineArgs {
    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn subcommand(&self) -> &Command {
        &self.command
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TEST_URL: &str = "https://example.com/users";
    const TEST_BODY: &str = "{ \"name\": \"foo\" }";
    const TEST_CONFIG: &str = "/tmp/htup.ini";
    const TEST_DIR: &str = "/tmp/htup-project";
    const TEST_HEADER: &str = "Authorization: Bearer token";

    #[test]
    fn test_cli() {
        use clap::CommandFactory;
        CommandLineArgs::command().debug_assert()
    }

    #[test]
    fn test_parse_send() {
        let params = vec![
            "htup", "-c", TEST_CONFIG, "-d", TEST_DIR, "send", "-X", "POST", TEST_URL, TEST_BODY,
            "--json", "-H", TEST_HEADER, "--header", "X-Trace: 1",
        ];
        let args = CommandLineArgs::parse_from(params.iter());

        assert_eq!(args.config(), TEST_CONFIG);
        assert_eq!(args.dir(), Some(TEST_DIR));
        assert!(!args.verbose());
        assert_eq!(
            args.subcommand(),
            &Command::Send {
                method: "POST".to_string(),
                url: TEST_URL.to_string(),
                body: Some(TEST_BODY.to_string()),
                headers: vec![TEST_HEADER.to_string(), "X-Trace: 1".to_string()],
                json: true,
            }
        );
    }

    #[test]
    fn test_send_defaults_to_get() {
        let args = CommandLineArgs::parse_from(["htup", "send", TEST_URL]);

        assert_eq!(args.config(), DEFAULT_INI_FILE_PATH);
        assert_eq!(args.dir(), None);
        assert_eq!(
            args.subcommand(),
            &Command::Send {
                method: DEFAULT_METHOD.to_string(),
                url: TEST_URL.to_string(),
                body: None,
                headers: vec![],
                json: false,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CommandLineArgs::parse_from(["htup", "run", "users/list", "-v", "-d", TEST_DIR]);

        assert!(args.verbose());
        assert_eq!(args.dir(), Some(TEST_DIR));
        assert_eq!(
            args.subcommand(),
            &Command::Run {
                name: "users/list".to_string(),
                json: false
            }
        );
    }

    #[test]
    fn test_parse_save() {
        let args =
            CommandLineArgs::parse_from(["htup", "save", "ep1.json", "-X", "put", TEST_URL, "-"]);

        assert_eq!(
            args.subcommand(),
            &Command::Save {
                name: "ep1.json".to_string(),
                method: "put".to_string(),
                url: TEST_URL.to_string(),
                body: Some("-".to_string()),
                headers: vec![],
            }
        );
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(CommandLineArgs::try_parse_from(["htup"]).is_err());
        assert!(CommandLineArgs::try_parse_from(["htup", "send"]).is_err());
    }
}
