use anyhow::{Context, Result, anyhow};

pub const CAPTURE_FPS: u32 = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct RawPlayer {
    pub team_id: i32,
    pub player_id: i64,
    pub squad_num: i32,
    pub x: i64,
    pub y: i64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawBall {
    pub x: i64,
    pub y: i64,
    pub z: f64,
    pub speed: f64,
    pub possession: String,
    pub in_play: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub frame_num: u64,
    pub players: Vec<RawPlayer>,
    pub ball: RawBall,
}

pub fn frame_number(line: &str) -> Result<u64> {
    let head = line.split(':').next().unwrap_or_default().trim();
    head.parse::<u64>()
        .with_context(|| format!("invalid frame number {head:?}"))
}

pub fn parse_frame(line: &str) -> Result<RawFrame> {
    let mut parts = line.trim_end().split(':');
    let frame_num = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<u64>()
        .context("frame number")?;
    let players_raw = parts
        .next()
        .ok_or_else(|| anyhow!("frame {frame_num}: missing player section"))?;
    let ball_raw = parts
        .next()
        .ok_or_else(|| anyhow!("frame {frame_num}: missing ball section"))?;

    let mut players = Vec::new();
    for entry in players_raw.split(';') {
        let fields = entry.split(',').collect::<Vec<_>>();
        // Trailing separators leave empty entries behind.
        if fields.len() <= 1 {
            continue;
        }
        players.push(
            parse_player(&fields).with_context(|| format!("frame {frame_num}: player {entry:?}"))?,
        );
    }

    let ball = parse_ball(ball_raw).with_context(|| format!("frame {frame_num}: ball"))?;

    Ok(RawFrame {
        frame_num,
        players,
        ball,
    })
}

pub fn format_frame(frame: &RawFrame) -> String {
    let mut line = format!("{}:", frame.frame_num);
    for p in &frame.players {
        line.push_str(&format!(
            "{},{},{},{},{},{:.2};",
            p.team_id, p.player_id, p.squad_num, p.x, p.y, p.speed
        ));
    }
    let b = &frame.ball;
    line.push_str(&format!(
        ":{},{},{},{:.2},{},{};",
        b.x, b.y, b.z, b.speed, b.possession, b.in_play
    ));
    line
}

fn parse_player(fields: &[&str]) -> Result<RawPlayer> {
    if fields.len() < 6 {
        return Err(anyhow!("expected 6 fields, got {}", fields.len()));
    }
    Ok(RawPlayer {
        team_id: fields[0].trim().parse().context("team id")?,
        player_id: fields[1].trim().parse().context("player id")?,
        squad_num: fields[2].trim().parse().context("squad number")?,
        x: fields[3].trim().parse().context("x")?,
        y: fields[4].trim().parse().context("y")?,
        speed: fields[5].trim().parse().context("speed")?,
    })
}

fn parse_ball(raw: &str) -> Result<RawBall> {
    let fields = raw
        .trim()
        .trim_end_matches(';')
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>();
    if fields.len() < 6 {
        return Err(anyhow!("expected 6 fields, got {}", fields.len()));
    }
    Ok(RawBall {
        x: fields[0].parse().context("x")?,
        y: fields[1].parse().context("y")?,
        z: fields[2].parse().context("z")?,
        speed: fields[3].parse().context("speed")?,
        possession: fields[4].to_string(),
        in_play: fields[5].trim_end_matches(';').to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "1349935:1,2,9,-1200,340,1.25;0,17,4,800,-220,0.5;:150,-20,11,3.4,H,Alive;";

    #[test]
    fn parses_players_and_ball() {
        let frame = parse_frame(LINE).unwrap();
        assert_eq!(frame.frame_num, 1349935);
        assert_eq!(frame.players.len(), 2);
        assert_eq!(frame.players[0].squad_num, 9);
        assert_eq!(frame.players[0].x, -1200);
        assert_eq!(frame.players[1].team_id, 0);
        assert_eq!(frame.ball.x, 150);
        assert_eq!(frame.ball.possession, "H");
        assert_eq!(frame.ball.in_play, "Alive");
    }

    #[test]
    fn frame_number_reads_prefix() {
        assert_eq!(frame_number(LINE).unwrap(), 1349935);
        assert!(frame_number("abc:1,2").is_err());
    }

    #[test]
    fn formatted_frame_parses_back() {
        let frame = parse_frame(LINE).unwrap();
        assert_eq!(parse_frame(&format_frame(&frame)).unwrap(), frame);
    }

    #[test]
    fn missing_ball_section_is_error() {
        assert!(parse_frame("10:1,2,9,0,0,0;").is_err());
    }
}
