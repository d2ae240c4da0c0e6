use std::io;

use quick_error::quick_error;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            from()
            display("I/O error: {}", err)
            source(err)
        }
        BadAddress(addr: String) {
            display("not an IPv4 address: {}", addr)
        }
        Resolve(spec: String) {
            display("cannot resolve upstream resolver: {}", spec)
        }
    }
}

mod codec;
pub use self::codec::{decode_query, decode_response, is_query, query_indicator};
pub use self::codec::{ByteReader, Query, Response, QUERY_INDICATOR};

mod answer;
pub use self::answer::build_answer;
