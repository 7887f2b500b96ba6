use alloc::vec;

use super::Chunk;

#[test]
fn split_front_keeps_the_tail_in_place() {
  let mut chunk = vec![1_u8, 2, 3, 4, 5];
  let front = chunk.split_front(2);
  assert_eq!(front, vec![1, 2]);
  assert_eq!(chunk, vec![3, 4, 5]);
  assert_eq!(chunk.byte_len(), 3);
}

#[test]
fn split_front_at_full_length_empties_the_chunk() {
  let mut chunk = vec![9_u8; 4];
  let front = chunk.split_front(4);
  assert_eq!(front.byte_len(), 4);
  assert!(chunk.is_empty());
}
