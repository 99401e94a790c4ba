use crate::domain::ports::Inverter;
use crate::protocol::{
    CumulativePeriod, MeasurementType, Request, Response, ResponseFrame, RESPONSE_LEN,
};
use crate::utils::error::{AuroraError, Result};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Request/response client for one Aurora bus, reached through any byte stream.
pub struct AuroraClient<S> {
    stream: S,
    request_timeout: Duration,
}

impl AuroraClient<TcpStream> {
    /// 連線到 TCP-serial 橋接器
    pub async fn connect(addr: SocketAddr, request_timeout: Duration) -> Result<Self> {
        let stream = tokio::time::timeout(request_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| AuroraError::TimeoutError {
                operation: format!("connection to {}", addr),
                seconds: request_timeout.as_secs_f64(),
            })??;
        stream.set_nodelay(true)?;
        tracing::info!("🔌 Connected to serial bridge at {}", addr);
        Ok(Self::new(stream, request_timeout))
    }
}

impl<S> AuroraClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, request_timeout: Duration) -> Self {
        Self {
            stream,
            request_timeout,
        }
    }

    pub async fn call(&mut self, address: u8, request: Request) -> Result<Response> {
        let frame = request.encode(address);
        tracing::debug!("➡️ {:?} to inverter {}: {:02x?}", request, address, frame);

        let mut buf = [0u8; RESPONSE_LEN];
        let exchange = async {
            self.stream.write_all(&frame).await?;
            self.stream.flush().await?;
            self.stream.read_exact(&mut buf).await?;
            Ok::<_, std::io::Error>(())
        };

        tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| AuroraError::TimeoutError {
                operation: format!("response to command {}", request.command()),
                seconds: self.request_timeout.as_secs_f64(),
            })??;

        tracing::debug!("⬅️ {:02x?}", buf);
        let response = ResponseFrame::decode(&buf)?;
        request.interpret(&response)
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait]
impl<S> Inverter for AuroraClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_pair(&mut self, address: u8) -> Result<(u32, f32)> {
        let energy = self
            .call(address, Request::CumulativeEnergy(CumulativePeriod::Daily))
            .await?;
        let voltage = self
            .call(
                address,
                Request::Measure {
                    kind: MeasurementType::Input1Voltage,
                    global: true,
                },
            )
            .await?;

        match (energy, voltage) {
            (Response::CumulativeEnergy { value, .. }, Response::Measure { value: volts, .. }) => {
                Ok((value, volts))
            }
            other => Err(AuroraError::ProtocolError {
                message: format!("unexpected response pair: {:?}", other),
            }),
        }
    }
}
