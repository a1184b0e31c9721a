pub fn cors(origin: Option<&str>) -> warp::cors::Builder {
    let builder = match origin {
        Some(origin) => warp::cors().allow_origin(origin),
        None => warp::cors().allow_any_origin(),
    };
    builder
        .allow_headers(vec![
            "User-Agent",
            "Sec-Fetch-Mode",
            "Referer",
            "Origin",
            "Access-Control-Request-Method",
            "Access-Control-Request-Headers",
            "Content-Type",
            "Accept",
            "Content-Length",
        ])
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
}
