// DHCP Server Task - Vergibt Adressen an Stationen im AP-Netz
use defmt::{Debug2Format, debug, error, info, warn};
use edge_dhcp::server::{Server as DhcpServer, ServerOptions as DhcpServerOptions};
use edge_dhcp::{Options as DhcpOptions, Packet as DhcpPacket};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Ipv4Address, Stack};

use crate::config::{
    AP_IP_ADDRESS, DHCP_CLIENT_PORT, DHCP_MAX_LEASES, DHCP_PACKET_SIZE, DHCP_RANGE_END,
    DHCP_RANGE_START, DHCP_SERVER_PORT, DHCP_UDP_META_SLOTS,
};
use crate::tasks::wifi::wait_for_link;

/// DHCP Server Task
///
/// Beantwortet DISCOVER/REQUEST über edge-dhcp.
/// Der erste Client (der Server mit den Board-Daten) bekommt `DHCP_RANGE_START`.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: Stack<'static>) {
    wait_for_link(stack).await;

    let mut rx_meta = [PacketMetadata::EMPTY; DHCP_UDP_META_SLOTS];
    let mut rx_buffer = [0u8; DHCP_PACKET_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; DHCP_UDP_META_SLOTS];
    let mut tx_buffer = [0u8; DHCP_PACKET_SIZE];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(e) = socket.bind(DHCP_SERVER_PORT) {
        error!(
            "DHCP: Failed to bind port {}: {}",
            DHCP_SERVER_PORT,
            Debug2Format(&e)
        );
        return;
    }
    info!("DHCP: Listening on port {}", DHCP_SERVER_PORT);

    // Gateway = eigene Adresse, DNS gibt es im AP-Netz nicht
    let mut gateways = [AP_IP_ADDRESS; 1];
    let server_options = DhcpServerOptions::new(AP_IP_ADDRESS, Some(&mut gateways));

    let mut server = DhcpServer::<_, DHCP_MAX_LEASES>::new_with_et(AP_IP_ADDRESS);
    server.range_start = DHCP_RANGE_START;
    server.range_end = DHCP_RANGE_END;

    let mut packet = [0u8; DHCP_PACKET_SIZE];

    loop {
        let len = match socket.recv_from(&mut packet).await {
            Ok((len, _remote)) => len,
            Err(e) => {
                warn!("DHCP: Receive failed: {}", Debug2Format(&e));
                continue;
            }
        };

        let request = match DhcpPacket::decode(&packet[..len]) {
            Ok(request) => request,
            Err(e) => {
                debug!(
                    "DHCP: Ignoring invalid packet ({} bytes): {}",
                    len,
                    Debug2Format(&e)
                );
                continue;
            }
        };

        let mut options = DhcpOptions::buf();
        let Some(reply) = server.handle_request(&mut options, &server_options, &request) else {
            continue;
        };

        // Client hat noch keine Adresse: Antwort als Broadcast
        let mut out = [0u8; DHCP_PACKET_SIZE];
        let encoded = match reply.encode(&mut out) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("DHCP: Encode failed: {}", Debug2Format(&e));
                continue;
            }
        };

        if reply.yiaddr != Ipv4Address::UNSPECIFIED {
            info!("DHCP: Replying with {}", Debug2Format(&reply.yiaddr));
        }

        let dest = (Ipv4Address::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(e) = socket.send_to(encoded, dest).await {
            warn!("DHCP: Send failed: {}", Debug2Format(&e));
        }
    }
}
