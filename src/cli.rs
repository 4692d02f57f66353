use clap::Parser;

/// FFmpeg + SDL2 RTSP media player.
#[derive(Parser, Debug)]
#[command(name = "rplay", version, about = "FFmpeg + SDL2 RTSP media player")]
pub struct Args {
    /// IP address of the RTSP server
    #[arg(short = 'i', long)]
    pub ip: String,

    /// RTSP port
    #[arg(short = 'p', long, default_value_t = 554)]
    pub port: u16,

    /// Stream path
    #[arg(short = 's', long)]
    pub stream: String,
}

impl Args {
    /// The derived connection URL.
    pub fn url(&self) -> String {
        format!("rtsp://{}:{}/{}", self.ip, self.port, self.stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_derivation_with_default_port() {
        let args = Args::parse_from(["rplay", "-i", "10.0.0.5", "-s", "cam/front"]);
        assert_eq!(args.port, 554);
        assert_eq!(args.url(), "rtsp://10.0.0.5:554/cam/front");
    }

    #[test]
    fn test_explicit_port() {
        let args = Args::parse_from(["rplay", "--ip", "host", "--port", "8554", "--stream", "s"]);
        assert_eq!(args.url(), "rtsp://host:8554/s");
    }

    #[test]
    fn test_missing_required_args_rejected() {
        assert!(Args::try_parse_from(["rplay", "-s", "cam"]).is_err());
        assert!(Args::try_parse_from(["rplay", "-i", "host"]).is_err());
    }
}
