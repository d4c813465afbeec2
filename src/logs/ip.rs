use serde_json::Value;

/// Extracts the client IPv4 address from an access log line.
///
/// JSON lines are read from `http_x_forwarded_for` (first hop) or else
/// `remote_addr`. Any other line is searched for its first standalone
/// dotted quad. Only addresses whose octets are all in `0..=255` are returned.
pub fn extract_ip(line: &str) -> Option<String> {
    match serde_json::from_str::<Value>(line) {
        Ok(value) => from_json(&value),
        Err(_) => find_dotted_quad(line)
            .filter(|ip| is_valid_ipv4(ip))
            .map(str::to_owned),
    }
}

fn from_json(value: &Value) -> Option<String> {
    let record = value.as_object()?;
    let forwarded_for = record
        .get("http_x_forwarded_for")
        .and_then(Value::as_str)
        .filter(|chain| !chain.is_empty());
    let ip = match forwarded_for {
        Some(chain) => chain.split(',').next().map(str::trim),
        None => record.get("remote_addr").and_then(Value::as_str),
    };
    ip.filter(|ip| is_valid_ipv4(ip)).map(str::to_owned)
}

/// Four dot-separated groups of one to three digits, each at most 255.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let octets: Vec<&str> = ip.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().is_ok_and(|value| value <= 255)
        })
}

/// Finds the first `\b(\d{1,3}\.){3}\d{1,3}\b` in `line`, without checking
/// octet ranges.
fn find_dotted_quad(line: &str) -> Option<&str> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    (0..chars.len())
        .filter(|&start| {
            chars[start].1.is_ascii_digit() && (start == 0 || !is_word(chars[start - 1].1))
        })
        .find_map(|start| {
            let end = match_quad_at(&chars, start)?;
            let to = chars.get(end).map_or(line.len(), |&(offset, _)| offset);
            Some(&line[chars[start].0..to])
        })
}

/// Returns the char position just past a dotted quad starting at `start`.
fn match_quad_at(chars: &[(usize, char)], start: usize) -> Option<usize> {
    let mut pos = start;
    for group in 0..4 {
        let digits = chars[pos..]
            .iter()
            .take_while(|(_, c)| c.is_ascii_digit())
            .count();
        if !(1..=3).contains(&digits) {
            return None;
        }
        pos += digits;
        let next = chars.get(pos).map(|&(_, c)| c);
        if group < 3 {
            if next != Some('.') {
                return None;
            }
            pos += 1;
        } else if next.is_some_and(is_word) {
            return None;
        }
    }
    Some(pos)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
