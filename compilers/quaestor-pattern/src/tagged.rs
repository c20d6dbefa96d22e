use nom::{
    bytes::complete::take_till1,
    character::complete::multispace0,
    IResult,
};
use quaestor_protocol::Token;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaggedParseError {
    #[error("item '{item}' at byte {offset} is not in surface/lemma/TAG form")]
    Malformed { item: String, offset: usize },
}

fn item(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(input)
}

/// Reads pre-tagged text: whitespace-separated `surface/lemma/TAG` items.
///
/// `surface/TAG` takes the lowercased surface as lemma. The last two slashes
/// delimit the fields, so a surface form may itself contain `/`.
pub fn parse_tagged(original_input: &str) -> Result<Vec<Token>, TaggedParseError> {
    let mut input = original_input;
    let mut tokens = Vec::new();

    loop {
        // 1. Skip whitespace
        let (next_input, _) = match multispace0::<&str, nom::error::Error<&str>>(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = next_input;

        if input.is_empty() {
            break;
        }

        // 2. Take one item
        let offset = original_input.len() - input.len();
        let (next_input, raw) = item(input).map_err(|_| TaggedParseError::Malformed {
            item: input.to_string(),
            offset,
        })?;

        let token = split_fields(raw).ok_or_else(|| TaggedParseError::Malformed {
            item: raw.to_string(),
            offset,
        })?;
        tokens.push(token);
        input = next_input;
    }

    Ok(tokens)
}

fn split_fields(raw: &str) -> Option<Token> {
    let mut fields = raw.rsplitn(3, '/');
    let tag = fields.next().filter(|f| !f.is_empty())?;
    let middle = fields.next().filter(|f| !f.is_empty())?;

    match fields.next() {
        Some(surface) if !surface.is_empty() => Some(Token::new(surface, middle, tag)),
        Some(_) => None,
        None => Some(Token::new(middle, middle.to_lowercase(), tag)),
    }
}
