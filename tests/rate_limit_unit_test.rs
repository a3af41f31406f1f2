//! Unit tests for the rate-limit client key.
//!
//! Run with: cargo test --test rate_limit_unit_test

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::Request;
use tower_governor::key_extractor::KeyExtractor;

use home_monitor::services::rate_limit::ClientIpKeyExtractor;

const TRUSTING: ClientIpKeyExtractor = ClientIpKeyExtractor {
    trust_proxy_headers: true,
};
const UNTRUSTING: ClientIpKeyExtractor = ClientIpKeyExtractor {
    trust_proxy_headers: false,
};

fn request(headers: &[(&str, &str)], peer: Option<[u8; 4]>) -> Request<()> {
    let mut builder = Request::get("/api/alarm");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let mut request = builder.body(()).unwrap();
    if let Some(peer) = peer {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 51000))));
    }
    request
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn first_forwarded_address_wins_when_trusted() {
    let req = request(
        &[("x-forwarded-for", "203.0.113.7, 10.0.0.1"), ("x-real-ip", "198.51.100.2")],
        Some([192, 0, 2, 1]),
    );

    assert_eq!(TRUSTING.extract(&req).unwrap(), ip("203.0.113.7"));
}

#[test]
fn real_ip_is_used_without_forwarded_for() {
    let req = request(&[("x-real-ip", "198.51.100.2")], Some([192, 0, 2, 1]));

    assert_eq!(TRUSTING.extract(&req).unwrap(), ip("198.51.100.2"));
}

#[test]
fn unparseable_headers_fall_back_to_peer() {
    let req = request(&[("x-forwarded-for", "not-an-ip")], Some([192, 0, 2, 1]));

    assert_eq!(TRUSTING.extract(&req).unwrap(), ip("192.0.2.1"));
}

#[test]
fn untrusted_headers_are_ignored() {
    let req = request(&[("x-forwarded-for", "203.0.113.7")], Some([192, 0, 2, 1]));

    assert_eq!(UNTRUSTING.extract(&req).unwrap(), ip("192.0.2.1"));
}

#[test]
fn unknown_client_shares_loopback_bucket() {
    let req = request(&[], None);

    assert_eq!(
        UNTRUSTING.extract(&req).unwrap(),
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    );
    assert_eq!(TRUSTING.extract(&req).unwrap(), IpAddr::V4(Ipv4Addr::LOCALHOST));
}
