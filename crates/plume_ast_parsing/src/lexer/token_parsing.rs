use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{anychar, digit1, satisfy};
use nom::combinator::{consumed, map, map_opt, recognize};
use nom::error::{context, VerboseError};
use nom::multi::many0_count;
use nom::sequence::pair;
use nom::IResult;
use plume_tokens::token::TokenKind;

type Result<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Recognizes the token at the start of `src`, returning its kind and its exact text
pub fn parse_token(src: &str) -> Result<(TokenKind, &str)> {
    context(
        "token",
        alt((parse_whitespace, parse_word, parse_integer, parse_punctuation)),
    )(src)
}

fn parse_whitespace(src: &str) -> Result<(TokenKind, &str)> {
    context(
        "whitespace",
        map(take_while1(|c: char| c == ' ' || c == '\n'), |text| {
            (TokenKind::Whitespace, text)
        }),
    )(src)
}

fn recognize_identifier(src: &str) -> Result<&str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        many0_count(satisfy(|c| c.is_ascii_alphanumeric())),
    ))(src)
}

fn parse_word(src: &str) -> Result<(TokenKind, &str)> {
    context(
        "word",
        map(recognize_identifier, |word| {
            (
                TokenKind::from_keyword(word).unwrap_or(TokenKind::Identifier),
                word,
            )
        }),
    )(src)
}

fn parse_integer(src: &str) -> Result<(TokenKind, &str)> {
    context(
        "integer",
        map(digit1, |digits| (TokenKind::Integer, digits)),
    )(src)
}

fn parse_punctuation(src: &str) -> Result<(TokenKind, &str)> {
    context(
        "punctuation",
        map_opt(consumed(anychar), |(text, c)| {
            TokenKind::from_punctuation(c).map(|kind| (kind, text))
        }),
    )(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword() {
        assert_eq!(parse_token("fun f"), Ok((" f", (TokenKind::Fun, "fun"))));
        assert_eq!(parse_token("imp"), Ok(("", (TokenKind::Imp, "imp"))));
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            parse_token("funny("),
            Ok(("(", (TokenKind::Identifier, "funny")))
        );
        assert_eq!(
            parse_token("x1y2 "),
            Ok((" ", (TokenKind::Identifier, "x1y2")))
        );
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_token("123abc"), Ok(("abc", (TokenKind::Integer, "123"))));
    }

    #[test]
    fn test_whitespace_run() {
        assert_eq!(
            parse_token(" \n  x"),
            Ok(("x", (TokenKind::Whitespace, " \n  ")))
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(parse_token(":int"), Ok(("int", (TokenKind::Colon, ":"))));
        assert!(parse_token("#").is_err());
        assert!(parse_token("\t").is_err());
        assert!(parse_token("").is_err());
    }
}
