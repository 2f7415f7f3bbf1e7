use snake_engine::games::snake::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerCommand {
    Start,
    Stop,
    Status,
    Quit,
    Turn(Direction),
}

impl RunnerCommand {
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let token = line.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let command = match token.to_ascii_lowercase().as_str() {
            "start" | "restart" => RunnerCommand::Start,
            "stop" => RunnerCommand::Stop,
            "status" => RunnerCommand::Status,
            "quit" | "exit" | "q" => RunnerCommand::Quit,
            _ => RunnerCommand::Turn(
                token
                    .parse()
                    .map_err(|_| format!("Unknown command: {}", token))?,
            ),
        };
        Ok(Some(command))
    }
}
