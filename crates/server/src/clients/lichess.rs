use std::time::Duration;

use pgn_core::Evaluation;
use reqwest::Client;
use serde::Deserialize;
use shakmaty::Color;

use super::EvalError;

/// Lichess cloud evaluation lookup by FEN.
pub struct LichessClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudEval {
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    pvs: Vec<CloudPv>,
}

#[derive(Debug, Deserialize)]
struct CloudPv {
    cp: Option<i32>,
    mate: Option<i32>,
}

impl LichessClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EvalError> {
        let client = Client::builder()
            .user_agent("PgnViewer/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the cached cloud evaluation of `fen`.
    /// Positions missing from the cloud database yield [`EvalError::NotInCloud`].
    pub async fn cloud_eval(&self, fen: &str) -> Result<Evaluation, EvalError> {
        let url = format!("{}/api/cloud-eval", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("fen", fen), ("multiPv", "1")])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EvalError::NotInCloud);
        }

        if !resp.status().is_success() {
            return Err(EvalError::Status(resp.status().as_u16()));
        }

        let text = resp.text().await?;
        parse_cloud_eval(&text)
    }
}

fn parse_cloud_eval(body: &str) -> Result<Evaluation, EvalError> {
    let data: CloudEval = serde_json::from_str(body)?;
    let pv = data
        .pvs
        .first()
        .ok_or_else(|| EvalError::Decode("cloud eval has no PV".into()))?;

    tracing::debug!(depth = ?data.depth, cp = ?pv.cp, mate = ?pv.mate, "Cloud eval");

    // Lichess reports scores from White's point of view already.
    match Evaluation::from_side_to_move(pv.cp, pv.mate, Color::White) {
        Evaluation::Unavailable => Err(EvalError::Decode("PV has neither cp nor mate".into())),
        eval => Ok(eval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cloud_eval_cp() {
        let body = r#"{"fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
            "knodes":1000,"depth":40,"pvs":[{"moves":"c7c5 g1f3","cp":26}]}"#;
        assert_eq!(parse_cloud_eval(body).unwrap(), Evaluation::Centipawns { cp: 26 });
    }

    #[test]
    fn test_parse_cloud_eval_mate() {
        let body = r#"{"depth":60,"pvs":[{"moves":"d8h4","mate":-1}]}"#;
        assert_eq!(parse_cloud_eval(body).unwrap(), Evaluation::Mate { moves: -1 });
    }

    #[test]
    fn test_parse_cloud_eval_without_pvs() {
        assert!(matches!(parse_cloud_eval(r#"{"pvs":[]}"#), Err(EvalError::Decode(_))));
        assert!(matches!(parse_cloud_eval("not json"), Err(EvalError::Json(_))));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let client = LichessClient::new(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let start = std::time::Instant::now();
        let result = client.cloud_eval("8/8/8/8/8/8/8/K6k w - - 0 1").await;

        assert!(matches!(result, Err(EvalError::Http(ref e)) if e.is_timeout()));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
