use super::combinators::*;
use super::core::{ParseError, Parser};

pub fn satisfy<I, O, F>(f: F) -> Satisfy<I, O, F>
where
    F: Fn(&I) -> Option<O>,
{
    Satisfy::new(f)
}

pub fn choice<I, O>(parsers: Vec<Box<dyn Parser<I, O>>>) -> Choice<I, O> {
    Choice::new(parsers)
}

pub fn preceded<P1, P2, I, O1, O2>(parser1: P1, parser2: P2) -> Preceded<P1, P2, I, O1>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    Preceded::new(parser1, parser2)
}

pub fn map<P, F, A, B, I>(parser: P, f: F) -> Map<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    Map::new(parser, f)
}

pub fn map_res<P, F, A, B, I>(parser: P, f: F) -> MapRes<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> Result<B, ParseError>,
{
    MapRes::new(parser, f)
}

pub fn optional<P, I, O>(parser: P) -> Optional<P, I, O>
where
    P: Parser<I, O>,
{
    Optional::new(parser)
}

pub fn tuple2<P1, P2, I, O1, O2>(parser1: P1, parser2: P2) -> Tuple2<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    Tuple2::new(parser1, parser2)
}

pub fn cut<P>(parser: P) -> Cut<P> {
    Cut::new(parser)
}

pub fn all_consuming<P>(parser: P) -> AllConsuming<P> {
    AllConsuming::new(parser)
}

pub fn with_context<P, C: ToString>(parser: P, c: C) -> WithContext<P, C> {
    WithContext::new(parser, c)
}
