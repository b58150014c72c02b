use anyhow::Result;
use ifpa_api::client::IfpaApi;
use ifpa_api::{RankingOrder, RankingsQuery};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    PastCalendar { country: Option<String>, state: Option<String> },
    ActiveCalendar { country: Option<String>, state: Option<String> },
    Player(String),
    PlayerHistory(String),
    PlayerResults(String),
    PlayerVsPlayer(String),
    CountryDirectors,
    SearchName(String),
    SearchEmail(String),
    Rankings(RankingsQuery),
    BiggestMovers,
}

impl Command {
    /// Parse arguments (program name already stripped). Missing required
    /// values are passed through empty so the client reports them.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        let arg = |i: usize| rest.get(i).cloned();
        let required = |i: usize| arg(i).unwrap_or_default();

        let command = match name.as_str() {
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" => Command::Version,
            "calendar-past" => Command::PastCalendar { country: arg(0), state: arg(1) },
            "calendar-active" => Command::ActiveCalendar { country: arg(0), state: arg(1) },
            "player" => Command::Player(required(0)),
            "player-history" => Command::PlayerHistory(required(0)),
            "player-results" => Command::PlayerResults(required(0)),
            "pvp" => Command::PlayerVsPlayer(required(0)),
            "country-directors" => Command::CountryDirectors,
            "search-name" => Command::SearchName(required(0)),
            "search-email" => Command::SearchEmail(required(0)),
            "rankings" => Command::Rankings(parse_rankings(rest)?),
            "biggest-movers" => Command::BiggestMovers,
            other => return Err(format!("Unknown command: {other}")),
        };
        Ok(command)
    }

    pub async fn run(&self, api: &IfpaApi) -> Result<Value> {
        let value = match self {
            Command::Help | Command::Version => Value::Null,
            Command::PastCalendar { country, state } => serde_json::to_value(
                api.past_calendar_events(country.as_deref(), state.as_deref()).await?,
            )?,
            Command::ActiveCalendar { country, state } => serde_json::to_value(
                api.active_calendar_events(country.as_deref(), state.as_deref()).await?,
            )?,
            Command::Player(id) => api.player_information(id).await?,
            Command::PlayerHistory(id) => api.player_history(id).await?,
            Command::PlayerResults(id) => api.player_results(id).await?,
            Command::PlayerVsPlayer(id) => api.player_vs_player(id).await?,
            Command::CountryDirectors => api.country_directors().await?,
            Command::SearchName(name) => api.search_players_by_name(name).await?,
            Command::SearchEmail(email) => api.search_players_by_email(email).await?,
            Command::Rankings(query) => api.rankings(query).await?,
            Command::BiggestMovers => api.biggest_movers().await?,
        };
        Ok(value)
    }
}

fn parse_rankings(rest: &[String]) -> Result<RankingsQuery, String> {
    let number = |i: usize, label: &str| -> Result<Option<u32>, String> {
        rest.get(i)
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| format!("{label} must be a non-negative number, got {raw:?}"))
            })
            .transpose()
    };

    Ok(RankingsQuery {
        start_pos: number(0, "START_POS")?,
        count: number(1, "COUNT")?,
        order: rest.get(2).map(|raw| raw.parse::<RankingOrder>()).transpose()?,
    })
}

pub fn usage_text() -> &'static str {
    "ifpa - query the IFPA pinball rankings API

Usage:
  ifpa calendar-past [COUNTRY [STATE]]
  ifpa calendar-active [COUNTRY [STATE]]
  ifpa player ID
  ifpa player-history ID
  ifpa player-results ID
  ifpa pvp ID
  ifpa country-directors
  ifpa search-name NAME
  ifpa search-email EMAIL
  ifpa rankings [START_POS [COUNT [ORDER]]]   ORDER: points | rating | eff_pct
  ifpa biggest-movers
  ifpa --help
  ifpa --version

Environment:
  IFPA_API_KEY        API key (required; may also come from .env)
  IFPA_BASE_URL       Override the API host (default https://api.ifpapinball.com)
  IFPA_TIMEOUT_SECS   Per-request timeout in seconds (default 10)
  RUST_LOG            Log level, e.g. debug"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        let args: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
        Command::parse(&args)
    }

    #[test]
    fn no_arguments_shows_help() {
        assert_eq!(parse(&[]), Ok(Command::Help));
        assert_eq!(parse(&["--version"]), Ok(Command::Version));
    }

    #[test]
    fn calendar_arguments_are_optional() {
        assert_eq!(
            parse(&["calendar-past"]),
            Ok(Command::PastCalendar { country: None, state: None })
        );
        assert_eq!(
            parse(&["calendar-active", "Canada", "Yukon"]),
            Ok(Command::ActiveCalendar {
                country: Some("Canada".into()),
                state: Some("Yukon".into()),
            })
        );
    }

    #[test]
    fn missing_player_id_passes_through_empty() {
        assert_eq!(parse(&["pvp"]), Ok(Command::PlayerVsPlayer(String::new())));
        assert_eq!(parse(&["player", "8435"]), Ok(Command::Player("8435".into())));
    }

    #[test]
    fn rankings_arguments_parse_in_order() {
        assert_eq!(parse(&["rankings"]), Ok(Command::Rankings(RankingsQuery::default())));
        assert_eq!(
            parse(&["rankings", "1", "25", "eff_pct"]),
            Ok(Command::Rankings(
                RankingsQuery::new().start_pos(1).count(25).order(RankingOrder::EffPct)
            ))
        );
        assert!(parse(&["rankings", "first"]).is_err());
        assert!(parse(&["rankings", "1", "25", "wins"]).is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert_eq!(parse(&["tournaments"]), Err("Unknown command: tournaments".into()));
    }

    #[tokio::test]
    async fn validation_errors_surface_before_any_request() {
        // Unroutable host: reaching the network would fail differently.
        let api = IfpaApi::new("key").with_base_url("http://127.0.0.1:9");
        let err = Command::PlayerVsPlayer(String::new()).run(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "playerId required");
    }
}
