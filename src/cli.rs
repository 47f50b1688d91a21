use std::sync::Arc;
use rustyline::{
    Config as RustyConfig, Editor, error::ReadlineError,
    completion::{Completer, Pair},
    hint::{Hinter, HistoryHinter},
    highlight::{Highlighter, MatchingBracketHighlighter, CmdKind},
    validate::Validator,
    Helper, history::FileHistory
};
use colored::Colorize;
use crate::{
    client::ConversationClient,
    config::Config,
    message::{Message, Role},
    transport::HttpTransport,
};

const COMMANDS: [&str; 3] = ["exit", "help", "history"];

#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Exit,
    Help,
    History,
    Empty,
    Send(&'a str),
}

pub fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Empty,
        "exit" => Input::Exit,
        "help" => Input::Help,
        "history" => Input::History,
        text => Input::Send(text),
    }
}

struct TourCompleter {
    hinter: HistoryHinter,
    bracket_highlighter: MatchingBracketHighlighter,
}

impl Helper for TourCompleter {}

impl Completer for TourCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Commands only make sense as the whole line.
        let word = &line[..pos];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair { display: cmd.to_string(), replacement: cmd.to_string() })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for TourCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &rustyline::Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for TourCompleter {
    fn highlight_hint<'h>(&self, hint: &'h str) -> std::borrow::Cow<'h, str> {
        std::borrow::Cow::Owned(hint.truecolor(128, 128, 128).to_string())
    }

    fn highlight<'l>(&self, line: &'l str, pos: usize) -> std::borrow::Cow<'l, str> {
        self.bracket_highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: CmdKind) -> bool {
        self.bracket_highlighter.highlight_char(line, pos, forced)
    }
}

impl Validator for TourCompleter {}

fn print_message(message: &Message) {
    match message.role {
        Role::User => println!("{}", message.content.white()),
        Role::Assistant => println!("{}", message.content.yellow()),
        Role::System => println!("{}", message.content.red()),
    }
}

fn print_history(client: &ConversationClient) {
    if client.transcript().is_empty() {
        println!("{}", "No conversation history yet.".truecolor(128, 128, 128));
        return;
    }
    println!("{}", "--- Conversation ---".yellow());
    for (i, msg) in client.transcript().iter().enumerate() {
        println!("{}[{}] {}:", "--- ".yellow(), i + 1, msg.role.as_str().to_uppercase().cyan());
        print_message(msg);
    }
    println!("{}", "--- End of Conversation ---".yellow());
}

pub fn run_cli(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(HttpTransport::new()?);
    let mut client = ConversationClient::new(config.endpoint_url()?, config.timeout()?, transport);

    let rusty_config = RustyConfig::builder()
        .completion_type(rustyline::CompletionType::List)
        .build();
    let mut rl: Editor<TourCompleter, FileHistory> = Editor::with_config(rusty_config)?;
    rl.set_helper(Some(TourCompleter {
        hinter: HistoryHinter {},
        bracket_highlighter: MatchingBracketHighlighter::new(),
    }));

    println!("{}", "Plan your trip with TourAI!".blue().bold());
    println!("{}", "Type 'help' for commands.".truecolor(128, 128, 128));

    loop {
        match rl.readline(&"tourai> ".green()) {
            Ok(line) => {
                let input = parse_input(&line);
                if input != Input::Empty {
                    rl.add_history_entry(line.trim())?;
                }
                match input {
                    Input::Empty => continue,
                    Input::Exit => break,
                    Input::Help => println!(
                        "{}",
                        "Workflow:\n\
                        - Type a question about your trip and wait for the assistant to reply\n\
                        \n\
                        Available commands:\n\
                        - history: Show the conversation so far\n\
                        - exit: Exit the program\n\
                        - help: Show this help message\n"
                            .blue()
                    ),
                    Input::History => print_history(&client),
                    Input::Send(text) => {
                        client.set_input(text);
                        if !client.can_send() {
                            continue;
                        }
                        client.submit()?;
                        if client.is_busy() {
                            println!("{}", "Thinking...".truecolor(128, 128, 128));
                        }
                        if let Some(reply) = client.wait() {
                            print_message(reply);
                        } else if let Some(last) = client.transcript().last() {
                            print_message(last);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(Box::new(e)),
        }
    }

    println!("{}", "Have a good trip!".blue());
    Ok(())
}
