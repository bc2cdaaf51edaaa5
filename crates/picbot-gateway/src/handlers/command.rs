//! Chat command parsing

/// A parsed bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `addpic <name> [url]`
    AddPic { name: String, url: Option<String> },
    /// `pic <name>`, or any unknown `<prefix><name>` (`explicit == false`)
    Pic { name: String, explicit: bool },
    /// `pics`
    Pics,
    /// `rmpic <name> <key>`
    RmPic { name: String, key: String },
    /// `alias <alias> <name>`
    Alias { alias: String, target: String },
    /// `unalias <alias>`
    Unalias { alias: String },
    /// A known command with missing arguments
    Usage(&'static str),
}

impl Command {
    /// Parse a message; `None` unless it starts with `prefix` followed by a word
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.trim().strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();
        let head = words.next()?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match head.as_str() {
            "addpic" => match args.as_slice() {
                [name] => Self::AddPic {
                    name: (*name).to_string(),
                    url: None,
                },
                [name, url, ..] => Self::AddPic {
                    name: (*name).to_string(),
                    url: Some((*url).to_string()),
                },
                [] => Self::Usage("addpic <name> [url]"),
            },
            "pic" => match args.first() {
                Some(name) => Self::Pic {
                    name: (*name).to_string(),
                    explicit: true,
                },
                None => Self::Usage("pic <name>"),
            },
            "pics" => Self::Pics,
            "rmpic" => match args.as_slice() {
                [name, key, ..] => Self::RmPic {
                    name: (*name).to_string(),
                    key: (*key).to_string(),
                },
                _ => Self::Usage("rmpic <name> <key>"),
            },
            "alias" => match args.as_slice() {
                [alias, target, ..] => Self::Alias {
                    alias: (*alias).to_string(),
                    target: (*target).to_string(),
                },
                _ => Self::Usage("alias <alias> <name>"),
            },
            "unalias" => match args.first() {
                Some(alias) => Self::Unalias {
                    alias: (*alias).to_string(),
                },
                None => Self::Usage("unalias <alias>"),
            },
            _ => Self::Pic {
                name: head,
                explicit: false,
            },
        };
        Some(command)
    }
}
