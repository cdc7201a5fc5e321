use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{take, tag, take_until};
use nom::character::complete::{digit1, line_ending, space0, space1};
use nom::combinator::{map_res, opt};

use crate::error::ColorError;


/// reads an instance from file, returns (n,m,adj_list)
pub fn read_from_file(filename:&str) -> Result<(usize, usize, Vec<Vec<usize>>), ColorError> {
    let content = fs::read_to_string(filename)
        .map_err(|e| ColorError::io(filename, e))?;
    read_from_str(&content)
}

/// reads an instance from the content of a DIMACS file, returns (n,m,adj_list)
pub fn read_from_str(content:&str) -> Result<(usize, usize, Vec<Vec<usize>>), ColorError> {
    let s1 = content.replace("\r", "");
    let s2 = skip_comments(s1.as_str())
        .map_err(|e| ColorError::Dimacs(format!("{:?}", e)))?.0;
    let (mut s3,(n,m)) = read_header(s2)
        .map_err(|_| ColorError::Dimacs("missing 'p edge n m' header".to_string()))?;
    let mut adj_list = vec![Vec::new() ; n];
    let mut check_nb_edges = 0;
    loop {
        if let Ok((tmp,_)) = skip_comments(s3) { s3 = tmp; }
        match read_edge(s3) {
            Ok((tmp,(a,b))) => {
                if a == 0 || b == 0 || a > n || b > n {
                    return Err(ColorError::VertexOutOfRange(a, b, n));
                }
                s3 = tmp;
                adj_list[a-1].push(b-1);
                adj_list[b-1].push(a-1);
                check_nb_edges += 1;
            }
            Err(_) => break,
        }
    }
    if check_nb_edges != m && 2*check_nb_edges != m {
        return Err(ColorError::Dimacs(
            format!("header announces {} edges, {} read", m, check_nb_edges)
        ));
    }
    Ok((n, m, adj_list))
}

/// skips a single comment
fn skip_comment(s:&str) -> IResult<&str, &str> {
    let (remaining,_) = tag("c")(s)?;
    let (remaining,_) = take_until("\n")(remaining)?;
    take(1usize)(remaining)
}

/// skips all comments
pub fn skip_comments(s:&str) -> IResult<&str, Vec<&str>> {
    nom::multi::many0(skip_comment)(s)
}

/// reads two numbers separated by spaces (and the end of the line if any)
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    let (s, n1) = map_res(digit1, |d:&str| d.parse::<usize>())(s)?;
    let (s, _) = space1(s)?;
    let (s, n2) = map_res(digit1, |d:&str| d.parse::<usize>())(s)?;
    let (s, _) = space0(s)?;
    let (s, _) = opt(line_ending)(s)?;
    Ok((s, (n1,n2)))
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    let (remaining,_) = alt((tag("p edge "), tag("p col ")))(s)?;
    read_two_integers(remaining)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    let (remaining,_) = tag("e ")(s)?;
    read_two_integers(remaining)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_instance() {
        let (n,m,adj) = read_from_file("insts/dimacs/grid2x2.col").unwrap();
        assert_eq!(n, 4);
        assert_eq!(m, 4);
        assert_eq!(adj[3].len(), 2);
    }

    #[test]
    fn test_read_comment1() {
        let s = "c this is a test comment\np edge 2 1\ne 1 2";
        assert_eq!(
            skip_comments(s),
            Ok((
                "p edge 2 1\ne 1 2",
                vec!["\n"]
            ))
        );
    }

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().0, "e 1 2");
        assert_eq!(read_header(s).unwrap().1, (2,1));
    }

    #[test]
    fn test_read_header_col() {
        let s = "p col 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().0, "e 1 2");
        assert_eq!(read_header(s).unwrap().1, (2,1));
    }

    #[test]
    fn test_read_edge() {
        let s = "e 1 2\n";
        assert_eq!(read_edge(s).unwrap().1, (1,2));
        assert_eq!(read_edge(s).unwrap().0, "");
        // last line without a line break
        assert_eq!(read_edge("e 3 4").unwrap(), ("", (3,4)));
    }

    #[test]
    fn test_comments_between_edges() {
        let (n,m,adj) = read_from_str("p edge 3 2\ne 1 2\nc middle\ne 2 3\n").unwrap();
        assert_eq!((n,m), (3,2));
        assert_eq!(adj[1], vec![0,2]);
    }

    #[test]
    fn test_edge_count_mismatch() {
        assert!(matches!(
            read_from_str("p edge 3 5\ne 1 2\n"),
            Err(ColorError::Dimacs(_))
        ));
    }

    #[test]
    fn test_vertex_out_of_range() {
        assert!(matches!(
            read_from_str("p edge 2 1\ne 1 3\n"),
            Err(ColorError::VertexOutOfRange(1, 3, 2))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(read_from_file("insts/dimacs/missing.col"), Err(ColorError::Io { .. })));
    }
}
