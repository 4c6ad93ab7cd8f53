// URL builders for the Riot endpoints the bot touches.

/// Maps a platform id (na1, euw1, ...) to its regional routing value.
pub fn regional_routing(region: &str) -> &'static str {
    match region {
        "na1" | "br1" | "la1" | "la2" => "americas",
        "euw1" | "eun1" | "tr1" | "ru" | "me1" => "europe",
        "kr" | "jp1" => "asia",
        "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => "sea",
        _ => "americas", // default
    }
}

pub fn account_by_riot_id(region: &str, game_name: &str, tag_line: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
        account_routing(region),
        encode_segment(game_name),
        encode_segment(tag_line)
    )
}

pub fn active_game(region: &str, puuid: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/spectator/v5/active-games/by-summoner/{}",
        region, puuid
    )
}

pub fn match_ids(region: &str, puuid: &str, count: usize) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
        regional_routing(region),
        puuid,
        count
    )
}

pub fn match_detail(region: &str, match_id: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/match/v5/matches/{}",
        regional_routing(region),
        match_id
    )
}

pub fn match_timeline(region: &str, match_id: &str) -> String {
    format!("{}/timeline", match_detail(region, match_id))
}

// Account-v1 has no sea cluster.
fn account_routing(region: &str) -> &'static str {
    match regional_routing(region) {
        "sea" => "asia",
        other => other,
    }
}

fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
