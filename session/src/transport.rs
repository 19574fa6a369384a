//! Outgoing packet delivery.

use std::convert::Infallible;

/// Unreliable, unordered delivery of whole packets to every peer.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn broadcast(&mut self, packet: &[u8]) -> Result<(), Self::Error>;
}

/// Collects packets in memory, for captures and tests.
impl Transport for Vec<Vec<u8>> {
    type Error = Infallible;

    fn broadcast(&mut self, packet: &[u8]) -> Result<(), Self::Error> {
        self.push(packet.to_vec());
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn broadcast(&mut self, packet: &[u8]) -> Result<(), Self::Error> {
        (**self).broadcast(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_twice<T: Transport>(mut transport: T) {
        transport.broadcast(&[1]).unwrap();
        transport.broadcast(&[2, 3]).unwrap();
    }

    #[test]
    fn vec_collects_packets() {
        let mut sent: Vec<Vec<u8>> = Vec::new();
        send_twice(&mut sent);
        assert_eq!(sent, vec![vec![1], vec![2, 3]]);
    }
}
