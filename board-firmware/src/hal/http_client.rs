// HTTP Client über embassy-net TCP
//
// Eine Verbindung pro Anfrage: verbinden, Request-Header senden,
// Antwort bis zum Ende in den Buffer lesen, Verbindung schließen.

use board_core::http::{parse_response, post_request, response_complete};
use board_core::{HttpClient, HttpError, HttpUrl, Response};
use defmt::{Debug2Format, debug, warn};
use embassy_net::Stack;
use embassy_net::tcp::{ConnectError, Error as TcpError, TcpSocket};
use embassy_time::{Duration, with_timeout};
use embedded_io_async::Write as _;

use crate::config::{TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE};

/// HTTP Client für den Poller
///
/// Hält die TCP-Buffer, damit sie nicht bei jeder Anfrage
/// auf dem Stack landen.
pub struct TcpHttpClient {
    stack: Stack<'static>,
    timeout: Duration,
    rx_buffer: [u8; TCP_RX_BUFFER_SIZE],
    tx_buffer: [u8; TCP_TX_BUFFER_SIZE],
}

impl TcpHttpClient {
    /// # Parameter
    /// - `stack`: embassy-net Stack des Access Points
    /// - `timeout`: gilt für Verbindungsaufbau und jede einzelne Lese-/Schreiboperation
    pub fn new(stack: Stack<'static>, timeout: Duration) -> Self {
        Self {
            stack,
            timeout,
            rx_buffer: [0; TCP_RX_BUFFER_SIZE],
            tx_buffer: [0; TCP_TX_BUFFER_SIZE],
        }
    }
}

impl HttpClient for TcpHttpClient {
    async fn post<'b>(
        &mut self,
        url: &HttpUrl<'_>,
        buf: &'b mut [u8],
    ) -> Result<Response<'b>, HttpError> {
        // Config-Validierung garantiert eine IPv4-Adresse
        let address = url.ipv4().ok_or(HttpError::Connect)?;
        let head = post_request(url)?;

        let mut socket = TcpSocket::new(self.stack, &mut self.rx_buffer, &mut self.tx_buffer);
        socket.set_timeout(Some(self.timeout));

        with_timeout(self.timeout, socket.connect((address, url.port())))
            .await
            .map_err(|_| HttpError::Timeout)?
            .map_err(map_connect_error)?;

        socket
            .write_all(head.as_bytes())
            .await
            .map_err(map_tcp_error)?;
        socket.flush().await.map_err(map_tcp_error)?;

        let mut len = 0;
        let result = loop {
            if len == buf.len() {
                warn!("HTTP: Response exceeds {} bytes", buf.len());
                break Err(HttpError::BufferFull);
            }

            match with_timeout(self.timeout, socket.read(&mut buf[len..])).await {
                Err(_) => break Err(HttpError::Timeout),
                Ok(Err(e)) => break Err(map_tcp_error(e)),
                // Server hat die Verbindung geschlossen
                Ok(Ok(0)) => break Ok(()),
                Ok(Ok(n)) => {
                    len += n;
                    if response_complete(&buf[..len]) {
                        break Ok(());
                    }
                }
            }
        };

        // FIN senden und begrenzt warten, bis er raus ist
        socket.close();
        match with_timeout(self.timeout, socket.flush()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("HTTP: Close failed: {}", Debug2Format(&e)),
            Err(_) => warn!("HTTP: Close timed out"),
        }
        result?;

        debug!("HTTP: Received {} bytes from {}", len, url.path());
        parse_response(&mut buf[..len])
    }
}

fn map_connect_error(e: ConnectError) -> HttpError {
    match e {
        ConnectError::TimedOut => HttpError::Timeout,
        _ => HttpError::Connect,
    }
}

fn map_tcp_error(_e: TcpError) -> HttpError {
    // Einziger Fehler ist ein Reset, auch nach abgelaufenem Socket-Timeout
    HttpError::Io
}
