//! Parser for the `headsetIP` field of a recorded event, which the server
//! writes as `address:role`, e.g. `192.168.0.31:Tablet`. The address half is
//! whatever the server saw on the wire (usually a dotted IPv4 address) and
//! the role half names which kind of client the message concerned.

use nom::{
    bytes::complete::{is_not, tag},
    combinator::{map, rest},
    error::Error,
    sequence::separated_pair,
    Finish, IResult,
};

use std::str::FromStr;

/// Which side of a tablet/headset pairing an endpoint belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRole {
    /// The hand-held tablet of a participant.
    Tablet,
    /// The head-mounted display of a participant.
    Headset,
    /// A role string this tool does not know about.
    Other(String),
}

/// A network identity recorded by the server: an address plus the role of
/// the client it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEndpoint {
    /// The client's network address as the server recorded it.
    pub address: String,
    /// The client's role.
    pub role: ClientRole,
}

fn parse_role(s: &str) -> IResult<&str, ClientRole> {
    map(rest, |r: &str| match r {
        "Tablet" => ClientRole::Tablet,
        "Headset" => ClientRole::Headset,
        other => ClientRole::Other(other.to_owned()),
    })(s)
}

fn parse_endpoint(s: &str) -> IResult<&str, ClientEndpoint> {
    map(
        separated_pair(is_not(":"), tag(":"), parse_role),
        |(address, role): (&str, ClientRole)| ClientEndpoint {
            address: address.to_owned(),
            role,
        },
    )(s)
}

impl FromStr for ClientEndpoint {
    type Err = Error<String>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_endpoint(s).finish() {
            Ok((_remaining, endpoint)) => Ok(endpoint),
            Err(Error { input, code }) => Err(Error {
                input: input.to_string(),
                code,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tablet_endpoint() {
        let ep: ClientEndpoint = "192.168.0.31:Tablet".parse().unwrap();
        assert_eq!(
            ep,
            ClientEndpoint {
                address: "192.168.0.31".to_owned(),
                role: ClientRole::Tablet,
            }
        );
    }

    #[test]
    fn headset_endpoint() {
        let ep: ClientEndpoint = "10.0.0.5:Headset".parse().unwrap();
        assert_eq!(ep.address, "10.0.0.5");
        assert_eq!(ep.role, ClientRole::Headset);
    }

    #[test]
    fn unknown_role_is_kept() {
        let ep: ClientEndpoint = "127.0.0.1:Monitor".parse().unwrap();
        assert_eq!(ep.role, ClientRole::Other("Monitor".to_owned()));
    }

    #[test]
    fn missing_role_is_an_error() {
        assert!("127.0.0.1".parse::<ClientEndpoint>().is_err());
    }
}
