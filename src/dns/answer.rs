//! Synthesizes answer datagrams for names the relay can resolve itself.

use std::io::{Cursor, Write};
use std::net::Ipv4Addr;

use byteorder::{BigEndian, WriteBytesExt};

use super::{ByteReader, Error};

const HEADER_LEN: usize = 12;
/// QR + RD + RA, NOERROR.
const RESPONSE_FLAGS: u16 = 0x8180;
/// Compression pointer to the name in the echoed question.
const QUESTION_POINTER: u16 = 0xc00c;
const TYPE_A: u16 = 1;
const CLASS_IN: u16 = 1;
const ANSWER_TTL: u32 = 3600;

/// Build a response datagram out of the query that asked and the addresses
/// the name resolves to: the original id and question section are echoed,
/// followed by one A record per address.
///
/// `Ok(None)` means there is nothing to send -- either no addresses were
/// given or the original buffer does not hold a usable question section.
pub fn build_answer(query: &[u8], addresses: &[String]) -> Result<Option<Vec<u8>>, Error> {
    if addresses.is_empty() {
        return Ok(None);
    }
    let question = match question_section(query) {
        Some(question) => question,
        None => return Ok(None),
    };
    let id = ByteReader::new(query).read_u16();

    let mut cursor = Cursor::new(Vec::with_capacity(HEADER_LEN + question.len() + 16 * addresses.len()));
    cursor.write_u16::<BigEndian>(id)?;
    cursor.write_u16::<BigEndian>(RESPONSE_FLAGS)?;
    cursor.write_u16::<BigEndian>(1)?; // QDCOUNT
    cursor.write_u16::<BigEndian>(addresses.len() as u16)?;
    cursor.write_u16::<BigEndian>(0)?; // NSCOUNT
    cursor.write_u16::<BigEndian>(0)?; // ARCOUNT
    cursor.write_all(question)?;
    for address in addresses {
        let ip: Ipv4Addr = address
            .parse()
            .map_err(|_| Error::BadAddress(address.clone()))?;
        cursor.write_u16::<BigEndian>(QUESTION_POINTER)?;
        cursor.write_u16::<BigEndian>(TYPE_A)?;
        cursor.write_u16::<BigEndian>(CLASS_IN)?;
        cursor.write_u32::<BigEndian>(ANSWER_TTL)?;
        cursor.write_u16::<BigEndian>(4)?; // RDLENGTH
        cursor.write_all(&ip.octets())?;
    }
    Ok(Some(cursor.into_inner()))
}

/// The question section of `query`: everything from the end of the header
/// through the zero terminator of the name plus the type and class words.
fn question_section(query: &[u8]) -> Option<&[u8]> {
    let name_len = query.get(HEADER_LEN..)?.iter().position(|&b| b == 0)?;
    let end = HEADER_LEN + name_len + 1 + 4;
    if end > query.len() {
        return None;
    }
    Some(&query[HEADER_LEN..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_query() -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[0] = 0x12;
        buf[1] = 0x34;
        buf[2] = 1;
        buf.extend_from_slice(b"\x07example\x03com\x00");
        buf.extend_from_slice(&[0, 1, 0, 1]); // QTYPE A, QCLASS IN
        buf
    }

    #[test]
    fn echoes_id_and_question() {
        let query = sample_query();
        let addrs = vec!["93.184.216.34".to_string()];
        let packet = build_answer(&query, &addrs).unwrap().unwrap();

        assert_eq!(&packet[0..2], &[0x12, 0x34]);
        assert_eq!(&packet[2..4], &[0x81, 0x80]);
        assert_eq!(&packet[4..6], &[0, 1]); // QDCOUNT
        assert_eq!(&packet[6..8], &[0, 1]); // ANCOUNT
        assert_eq!(&packet[12..29], &query[12..29]);
    }

    #[test]
    fn one_record_per_address() {
        let query = sample_query();
        let addrs = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];
        let packet = build_answer(&query, &addrs).unwrap().unwrap();

        assert_eq!(&packet[6..8], &[0, 2]);
        // 16 bytes per record after the echoed question
        let records = &packet[29..];
        assert_eq!(records.len(), 32);
        assert_eq!(&records[0..2], &[0xc0, 0x0c]);
        assert_eq!(&records[2..4], &[0, 1]); // TYPE A
        assert_eq!(&records[4..6], &[0, 1]); // CLASS IN
        assert_eq!(&records[10..12], &[0, 4]); // RDLENGTH
        assert_eq!(&records[12..16], &[10, 0, 0, 1]);
        assert_eq!(&records[28..32], &[10, 0, 0, 2]);
    }

    #[test]
    fn no_addresses_no_packet() {
        assert!(build_answer(&sample_query(), &[]).unwrap().is_none());
    }

    #[test]
    fn unterminated_question_no_packet() {
        let mut query = vec![0u8; HEADER_LEN];
        query.extend_from_slice(b"\x07example"); // never terminated
        let addrs = vec!["10.0.0.1".to_string()];
        assert!(build_answer(&query, &addrs).unwrap().is_none());
    }

    #[test]
    fn malformed_address_is_an_error() {
        let addrs = vec!["not-an-ip".to_string()];
        assert!(build_answer(&sample_query(), &addrs).is_err());
    }
}
